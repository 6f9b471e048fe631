use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::DashboardStats;

/// REST DTO for `GET /stats/dashboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(title = "DashboardStats")]
pub struct DashboardStatsDto {
    /// Distinct contacts with an interaction since 00:00 UTC today.
    pub visitors: u64,
    /// All interactions, any time.
    pub conversations: u64,
    pub unread_alerts: u64,
    pub upcoming_reminders: u64,
}

impl From<DashboardStats> for DashboardStatsDto {
    fn from(s: DashboardStats) -> Self {
        Self {
            visitors: s.visitors,
            conversations: s.conversations,
            unread_alerts: s.unread_alerts,
            upcoming_reminders: s.upcoming_reminders,
        }
    }
}
