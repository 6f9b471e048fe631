//! SeaORM-backed implementation of the statistics port.
//!
//! The repository is generic over `C: ConnectionTrait`, so it runs against a
//! plain `DatabaseConnection` or a `DatabaseTransaction`. Request-scoped
//! sessions use the transactional form; see [`SeaOrmSessionFactory`].

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::Interaction;
use crate::domain::repo::{SessionFactory, StatsRepository, StatsSession};
use crate::infra::storage::entity::{alerts, interactions, reminders};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmStatsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmStatsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Interactions of `user_id` with `from <= timestamp <= to`.
    ///
    /// SQLite keeps timestamps as TEXT in whatever layout the writer chose,
    /// so both sides go through `julianday` there.
    fn window(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> sea_orm::Select<interactions::Entity> {
        let query = interactions::Entity::find().filter(interactions::Column::UserId.eq(user_id));
        match self.conn.get_database_backend() {
            DbBackend::Sqlite => query
                .filter(Expr::cust_with_values(
                    r#"julianday("timestamp") >= julianday(?)"#,
                    [from],
                ))
                .filter(Expr::cust_with_values(
                    r#"julianday("timestamp") <= julianday(?)"#,
                    [to],
                )),
            _ => query
                .filter(interactions::Column::Timestamp.gte(from))
                .filter(interactions::Column::Timestamp.lte(to)),
        }
    }
}

#[async_trait]
impl<C> StatsRepository for SeaOrmStatsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn count_visitors(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<u64> {
        // COUNT(*) over SELECT DISTINCT contact_id ...
        self.window(user_id, from, to)
            .filter(interactions::Column::ContactId.is_not_null())
            .select_only()
            .column(interactions::Column::ContactId)
            .distinct()
            .count(&self.conn)
            .await
            .context("count_visitors failed")
    }

    async fn count_conversations(&self, user_id: Uuid) -> anyhow::Result<u64> {
        interactions::Entity::find()
            .filter(interactions::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("count_conversations failed")
    }

    async fn count_unread_alerts(&self, user_id: Uuid) -> anyhow::Result<u64> {
        alerts::Entity::find()
            .filter(alerts::Column::UserId.eq(user_id))
            .filter(alerts::Column::Read.eq(false))
            .count(&self.conn)
            .await
            .context("count_unread_alerts failed")
    }

    async fn count_upcoming_reminders(&self, user_id: Uuid) -> anyhow::Result<u64> {
        reminders::Entity::find()
            .filter(reminders::Column::UserId.eq(user_id))
            .filter(reminders::Column::Completed.eq(false))
            .filter(reminders::Column::Enabled.eq(true))
            .count(&self.conn)
            .await
            .context("count_upcoming_reminders failed")
    }

    async fn list_interactions(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Interaction>> {
        let rows = self.window(user_id, from, to)
            .order_by_asc(interactions::Column::Timestamp)
            .all(&self.conn)
            .await
            .context("list_interactions failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl StatsSession for SeaOrmStatsRepository<DatabaseTransaction> {
    async fn close(self: Box<Self>) -> anyhow::Result<()> {
        self.conn.commit().await.context("closing session failed")
    }
}

/// Opens one read transaction per request.
#[derive(Clone)]
pub struct SeaOrmSessionFactory {
    conn: DatabaseConnection,
}

impl SeaOrmSessionFactory {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionFactory for SeaOrmSessionFactory {
    async fn open(&self) -> anyhow::Result<Box<dyn StatsSession>> {
        let txn = self.conn.begin().await.context("opening session failed")?;
        Ok(Box::new(SeaOrmStatsRepository::new(txn)))
    }
}
