use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::Interaction;

/// Port for the domain layer: the counting queries the dashboard needs.
/// Every method is scoped to one user.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Distinct non-null `contact_id`s among the user's interactions with
    /// `from <= timestamp <= to`.
    async fn count_visitors(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<u64>;

    /// All interactions of the user.
    async fn count_conversations(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// Alerts with `read = false`.
    async fn count_unread_alerts(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// Reminders with `completed = false AND enabled = true`.
    async fn count_upcoming_reminders(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// Interactions in the window, oldest first. Diagnostics only.
    async fn list_interactions(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Interaction>>;
}

/// A read session: a repository bound to one unit of work.
///
/// `close` ends the session normally. Dropping a session without closing it
/// releases it as well (the work is rolled back), so an early return on
/// error never leaks it.
#[async_trait]
pub trait StatsSession: StatsRepository {
    async fn close(self: Box<Self>) -> anyhow::Result<()>;
}

/// Opens request-scoped sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> anyhow::Result<Box<dyn StatsSession>>;
}
