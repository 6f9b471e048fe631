use serde::{Deserialize, Serialize};

/// Configuration for the dashboard_stats module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardStatsConfig {
    /// Log every interaction inspected for the visitor count at debug level
    /// (target `dashboard_stats`).
    #[serde(default)]
    pub trace_interactions: bool,
}
