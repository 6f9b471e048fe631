use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{client::DashboardStatsApi, error::StatsError, model::DashboardStats};
use crate::domain::service::Service;

/// Local implementation of the DashboardStatsApi trait that delegates to the domain service
pub struct DashboardStatsLocalClient {
    service: Arc<Service>,
}

impl DashboardStatsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DashboardStatsApi for DashboardStatsLocalClient {
    async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, StatsError> {
        self.service.dashboard(user_id).await.map_err(Into::into)
    }

    async fn dashboard_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, StatsError> {
        self.service
            .dashboard_at(user_id, now)
            .await
            .map_err(Into::into)
    }
}
