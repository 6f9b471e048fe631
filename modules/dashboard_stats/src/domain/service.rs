use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, Level};
use uuid::Uuid;

use crate::contract::model::DashboardStats;
use crate::domain::aggregator::{aggregate, day_start};
use crate::domain::error::DomainError;
use crate::domain::repo::{SessionFactory, StatsRepository};

/// Domain service: one session per call, four counts, then release.
/// Depends only on the session port, not on infra types.
#[derive(Clone)]
pub struct Service {
    sessions: Arc<dyn SessionFactory>,
    config: ServiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Emit a debug event per interaction in today's window.
    pub trace_interactions: bool,
}

impl Service {
    pub fn new(sessions: Arc<dyn SessionFactory>, config: ServiceConfig) -> Self {
        Self { sessions, config }
    }

    pub async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, DomainError> {
        self.dashboard_at(user_id, Utc::now()).await
    }

    #[instrument(
        name = "dashboard_stats.service.dashboard",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn dashboard_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, DomainError> {
        let session = self
            .sessions
            .open()
            .await
            .map_err(DomainError::from_repo)?;

        if self.config.trace_interactions
            && tracing::enabled!(target: "dashboard_stats", Level::DEBUG)
        {
            self.trace_interactions(&*session, user_id, now).await?;
        }

        let stats = aggregate(&*session, user_id, now).await?;
        session.close().await.map_err(DomainError::from_repo)?;

        debug!(
            visitors = stats.visitors,
            conversations = stats.conversations,
            unread_alerts = stats.unread_alerts,
            upcoming_reminders = stats.upcoming_reminders,
            "dashboard computed"
        );
        Ok(stats)
    }

    async fn trace_interactions<R>(
        &self,
        repo: &R,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>
    where
        R: StatsRepository + ?Sized,
    {
        let from = day_start(now);
        let rows = repo
            .list_interactions(user_id, from, now)
            .await
            .map_err(DomainError::from_repo)?;
        for i in &rows {
            debug!(
                target: "dashboard_stats",
                interaction_id = %i.id,
                contact_id = ?i.contact_id,
                timestamp = %i.timestamp.to_rfc3339(),
                "interaction in window"
            );
        }
        debug!(target: "dashboard_stats", count = rows.len(), %from, %now, "visitor window");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Interaction;
    use crate::domain::repo::StatsSession;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
        dropped: AtomicUsize,
    }

    struct FakeSession {
        counters: Arc<Counters>,
        rows: Vec<Interaction>,
        fail: bool,
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.counters.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl StatsRepository for FakeSession {
        async fn count_visitors(
            &self,
            _user_id: Uuid,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> anyhow::Result<u64> {
            if self.fail {
                anyhow::bail!("disk I/O error");
            }
            Ok(self.rows.len() as u64)
        }
        async fn count_conversations(&self, _user_id: Uuid) -> anyhow::Result<u64> {
            Ok(7)
        }
        async fn count_unread_alerts(&self, _user_id: Uuid) -> anyhow::Result<u64> {
            Ok(0)
        }
        async fn count_upcoming_reminders(&self, _user_id: Uuid) -> anyhow::Result<u64> {
            Ok(1)
        }
        async fn list_interactions(
            &self,
            _user_id: Uuid,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> anyhow::Result<Vec<Interaction>> {
            Ok(self.rows.clone())
        }
    }

    #[async_trait]
    impl StatsSession for FakeSession {
        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeFactory {
        counters: Arc<Counters>,
        rows: Vec<Interaction>,
        fail: bool,
    }

    #[async_trait]
    impl SessionFactory for FakeFactory {
        async fn open(&self) -> anyhow::Result<Box<dyn StatsSession>> {
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                counters: self.counters.clone(),
                rows: self.rows.clone(),
                fail: self.fail,
            }))
        }
    }

    fn service(rows: Vec<Interaction>, fail: bool, trace: bool) -> (Service, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let factory = FakeFactory {
            counters: counters.clone(),
            rows,
            fail,
        };
        let svc = Service::new(
            Arc::new(factory),
            ServiceConfig {
                trace_interactions: trace,
            },
        );
        (svc, counters)
    }

    fn interaction(user_id: Uuid) -> Interaction {
        Interaction {
            id: Uuid::new_v4(),
            user_id,
            contact_id: Some(Uuid::new_v4()),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn session_is_closed_after_success() {
        let user = Uuid::new_v4();
        let (svc, counters) = service(vec![interaction(user)], false, false);

        let stats = svc.dashboard(user).await.unwrap();
        assert_eq!(stats.visitors, 1);
        assert_eq!(stats.conversations, 7);

        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
        assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn session_is_released_without_close_on_failure() {
        let (svc, counters) = service(Vec::new(), true, false);

        let err = svc.dashboard(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::Database { .. }));

        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
        assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
    }

    #[traced_test]
    #[tokio::test]
    async fn traces_each_interaction_when_enabled() {
        let user = Uuid::new_v4();
        let row = interaction(user);
        let id = row.id.to_string();
        let (svc, _) = service(vec![row], false, true);

        svc.dashboard(user).await.unwrap();

        assert!(logs_contain("interaction in window"));
        assert!(logs_contain(&id));
    }

    #[traced_test]
    #[tokio::test]
    async fn interaction_trace_is_off_by_default() {
        let user = Uuid::new_v4();
        let (svc, _) = service(vec![interaction(user)], false, false);

        svc.dashboard(user).await.unwrap();

        assert!(!logs_contain("interaction in window"));
        assert!(logs_contain("dashboard computed"));
    }
}
