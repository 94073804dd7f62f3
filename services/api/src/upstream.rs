//! Shared transport for the external model endpoints.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};

const MAX_BACKOFF_SECS: u64 = 30;
const MAX_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Exponential backoff before retry `attempt`, capped at 30 seconds.
pub fn backoff_secs(attempt: u32) -> u64 {
    std::cmp::min(1u64 << attempt.min(5), MAX_BACKOFF_SECS)
}

/// Send the request produced by `build`, retrying timeouts, connection
/// failures, 429 and 5xx up to `max_retries` times. Other 4xx fail at once.
/// Returns the first successful response.
pub async fn send_with_retry<F>(
    target: &'static str,
    max_retries: u32,
    build: F,
) -> Result<Response, UpstreamError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error = String::new();

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let backoff_secs = backoff_secs(attempt);
            tracing::warn!(target_api = target, attempt, backoff_secs, "retrying after backoff");
            tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
        }

        let response = match build().send().await {
            Ok(resp) => resp,
            Err(e) => {
                last_error = e.to_string();
                if e.is_timeout() || e.is_connect() {
                    continue;
                }
                return Err(UpstreamError::RequestError(e));
            }
        };

        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
            {
                let wait = std::cmp::min(retry_after, MAX_RETRY_AFTER_SECS);
                tracing::warn!(target_api = target, wait, "rate-limited, waiting Retry-After");
                tokio::time::sleep(Duration::from_secs(wait)).await;
            }
            last_error = "429 Too Many Requests".to_string();
            continue;
        }

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            last_error = format!("{status}: {body}");
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::HttpError { status, body });
    }

    Err(UpstreamError::MaxRetriesExceeded {
        attempts: max_retries + 1,
        last_error,
    })
}
