//! Compiled-in KPI definitions.
//!
//! Each definition carries three cutoffs that split raw values into the
//! excellent / good / fair / poor tiers. For regular KPIs the cutoffs
//! descend (`excellent >= good >= fair`); for `inverse` KPIs, where lower is
//! better, they ascend. The scorer relies on that ordering without checking
//! it; the table test below does.
//!
//! `weight` is relative importance inside the KPI's category only.
use pulse_db::health::models::KpiCategory;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KpiUnit {
    Percent,
    Currency,
    Count,
    Days,
    Hours,
    Months,
    Ratio,
    Score,
    Boolean,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: KpiCategory,
    pub weight: f64,
    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub fair_threshold: f64,
    pub inverse: bool,
    pub unit: KpiUnit,
    /// Accepts string readings such as `"87%"` and parses them as numbers.
    pub text_valued: bool,
}

impl KpiDefinition {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        category: KpiCategory,
        weight: f64,
        thresholds: [f64; 3],
        unit: KpiUnit,
    ) -> Self {
        Self {
            key,
            name,
            description,
            category,
            weight,
            excellent_threshold: thresholds[0],
            good_threshold: thresholds[1],
            fair_threshold: thresholds[2],
            inverse: false,
            unit,
            text_valued: false,
        }
    }

    /// Lower raw values score higher.
    pub const fn lower_is_better(mut self) -> Self {
        self.inverse = true;
        self
    }

    pub const fn accepts_text(mut self) -> Self {
        self.text_valued = true;
        self
    }

    /// Thresholds ignored; a flag KPI scores 100 or 0.
    pub const fn flag(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        category: KpiCategory,
        weight: f64,
    ) -> Self {
        Self {
            key,
            name,
            description,
            category,
            weight,
            excellent_threshold: 1.0,
            good_threshold: 1.0,
            fair_threshold: 1.0,
            inverse: false,
            unit: KpiUnit::Boolean,
            text_valued: false,
        }
    }
}

pub const KPI_DEFINITIONS: &[KpiDefinition] = &[
    // sales
    KpiDefinition::new(
        "monthly_revenue_growth",
        "Monthly Revenue Growth",
        "Month-over-month change in booked revenue",
        KpiCategory::Sales,
        1.0,
        [15.0, 8.0, 2.0],
        KpiUnit::Percent,
    ),
    KpiDefinition::new(
        "win_rate",
        "Win Rate",
        "Share of closed deals that were won",
        KpiCategory::Sales,
        1.0,
        [40.0, 25.0, 15.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "pipeline_coverage",
        "Pipeline Coverage",
        "Open pipeline value divided by the period quota",
        KpiCategory::Sales,
        0.8,
        [4.0, 3.0, 2.0],
        KpiUnit::Ratio,
    ),
    KpiDefinition::new(
        "average_deal_size",
        "Average Deal Size",
        "Mean value of deals won in the period",
        KpiCategory::Sales,
        0.6,
        [25_000.0, 10_000.0, 5_000.0],
        KpiUnit::Currency,
    ),
    KpiDefinition::new(
        "sales_cycle_length",
        "Sales Cycle Length",
        "Median days from deal creation to close",
        KpiCategory::Sales,
        0.7,
        [30.0, 60.0, 90.0],
        KpiUnit::Days,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "deals_closed",
        "Deals Closed",
        "Deals moved to won in the period",
        KpiCategory::Sales,
        0.8,
        [20.0, 10.0, 5.0],
        KpiUnit::Count,
    ),
    // finance
    KpiDefinition::new(
        "gross_profit_margin",
        "Gross Profit Margin",
        "Revenue minus cost of goods sold, over revenue",
        KpiCategory::Finance,
        1.0,
        [60.0, 40.0, 25.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "net_profit_margin",
        "Net Profit Margin",
        "Net income over revenue",
        KpiCategory::Finance,
        1.0,
        [20.0, 10.0, 5.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "cash_runway",
        "Cash Runway",
        "Months of operation covered by cash on hand",
        KpiCategory::Finance,
        0.9,
        [18.0, 12.0, 6.0],
        KpiUnit::Months,
    ),
    KpiDefinition::new(
        "days_sales_outstanding",
        "Days Sales Outstanding",
        "Average days to collect an invoice",
        KpiCategory::Finance,
        0.7,
        [30.0, 45.0, 60.0],
        KpiUnit::Days,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "expense_ratio",
        "Expense Ratio",
        "Operating expenses divided by revenue",
        KpiCategory::Finance,
        0.6,
        [0.8, 1.0, 1.2],
        KpiUnit::Ratio,
    )
    .lower_is_better(),
    // support
    KpiDefinition::new(
        "first_response_time",
        "First Response Time",
        "Median hours until a ticket gets its first reply",
        KpiCategory::Support,
        0.8,
        [1.0, 4.0, 8.0],
        KpiUnit::Hours,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "resolution_time",
        "Resolution Time",
        "Median hours from ticket open to resolved",
        KpiCategory::Support,
        0.9,
        [8.0, 24.0, 48.0],
        KpiUnit::Hours,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "customer_satisfaction",
        "Customer Satisfaction",
        "Share of positive post-ticket survey answers",
        KpiCategory::Support,
        1.0,
        [90.0, 80.0, 70.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "ticket_backlog",
        "Ticket Backlog",
        "Open tickets older than one day",
        KpiCategory::Support,
        0.6,
        [10.0, 25.0, 50.0],
        KpiUnit::Count,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "net_promoter_score",
        "Net Promoter Score",
        "Promoters minus detractors",
        KpiCategory::Support,
        0.8,
        [50.0, 30.0, 10.0],
        KpiUnit::Score,
    ),
    // marketing
    KpiDefinition::new(
        "lead_conversion_rate",
        "Lead Conversion Rate",
        "Share of leads that became opportunities",
        KpiCategory::Marketing,
        1.0,
        [10.0, 5.0, 2.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "customer_acquisition_cost",
        "Customer Acquisition Cost",
        "Marketing and sales spend per new customer",
        KpiCategory::Marketing,
        0.9,
        [200.0, 500.0, 1_000.0],
        KpiUnit::Currency,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "website_traffic_growth",
        "Website Traffic Growth",
        "Month-over-month change in unique visitors",
        KpiCategory::Marketing,
        0.6,
        [20.0, 10.0, 3.0],
        KpiUnit::Percent,
    ),
    KpiDefinition::new(
        "email_open_rate",
        "Email Open Rate",
        "Share of campaign emails opened",
        KpiCategory::Marketing,
        0.5,
        [30.0, 20.0, 15.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "marketing_roi",
        "Marketing ROI",
        "Attributed revenue over marketing spend",
        KpiCategory::Marketing,
        0.8,
        [5.0, 3.0, 1.5],
        KpiUnit::Ratio,
    ),
    // operations
    KpiDefinition::new(
        "on_time_delivery_rate",
        "On-Time Delivery Rate",
        "Share of commitments delivered by their due date",
        KpiCategory::Operations,
        1.0,
        [95.0, 85.0, 75.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
    KpiDefinition::new(
        "task_completion_rate",
        "Task Completion Rate",
        "Share of tasks due in the period that were completed",
        KpiCategory::Operations,
        0.9,
        [90.0, 75.0, 60.0],
        KpiUnit::Percent,
    ),
    KpiDefinition::new(
        "overdue_tasks",
        "Overdue Tasks",
        "Open tasks past their due date",
        KpiCategory::Operations,
        0.7,
        [2.0, 5.0, 10.0],
        KpiUnit::Count,
    )
    .lower_is_better(),
    KpiDefinition::new(
        "team_utilization",
        "Team Utilization",
        "Booked hours over available hours",
        KpiCategory::Operations,
        0.7,
        [85.0, 70.0, 55.0],
        KpiUnit::Percent,
    ),
    KpiDefinition::new(
        "calendar_booking_rate",
        "Calendar Booking Rate",
        "Share of offered appointment slots that were booked",
        KpiCategory::Operations,
        0.5,
        [80.0, 60.0, 40.0],
        KpiUnit::Percent,
    ),
    // maturity
    KpiDefinition::flag(
        "crm_adopted",
        "CRM Adopted",
        "Contacts and deals are managed in the CRM",
        KpiCategory::Maturity,
        1.0,
    ),
    KpiDefinition::flag(
        "documented_processes",
        "Documented Processes",
        "Core processes are written down and shared",
        KpiCategory::Maturity,
        0.8,
    ),
    KpiDefinition::new(
        "automated_workflows",
        "Automated Workflows",
        "Active automations across sales and operations",
        KpiCategory::Maturity,
        0.7,
        [10.0, 5.0, 2.0],
        KpiUnit::Count,
    ),
    KpiDefinition::new(
        "connected_integrations",
        "Connected Integrations",
        "External data sources feeding the workspace",
        KpiCategory::Maturity,
        0.8,
        [5.0, 3.0, 1.0],
        KpiUnit::Count,
    ),
    KpiDefinition::new(
        "contact_data_completeness",
        "Contact Data Completeness",
        "Share of contacts with email, phone and company filled",
        KpiCategory::Maturity,
        0.6,
        [90.0, 75.0, 60.0],
        KpiUnit::Percent,
    )
    .accepts_text(),
];
