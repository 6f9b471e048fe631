use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::{error::StatsError, model::DashboardStats};

/// In-process API for other modules.
#[async_trait]
pub trait DashboardStatsApi: Send + Sync {
    /// Dashboard counters for `user_id` as of now.
    async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, StatsError>;

    /// Dashboard counters for `user_id` as of `now`.
    async fn dashboard_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, StatsError>;
}
