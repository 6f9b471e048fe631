#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_stats::infra::storage::entity::{alerts, interactions, reminders, users};
use dashboard_stats::infra::storage::migrations::Migrator;
use db::{ConnectOpts, DbHandle};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, Set, Statement};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// Fresh in-memory database with the module schema applied.
pub async fn migrated_db() -> Arc<DbHandle> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("connect sqlite");
    Migrator::up(db.seaorm(), None).await.expect("migrate");
    Arc::new(db)
}

pub async fn user(conn: &DatabaseConnection) -> Uuid {
    let id = Uuid::new_v4();
    users::ActiveModel { id: Set(id) }
        .insert(conn)
        .await
        .expect("insert user");
    id
}

pub async fn interaction(
    conn: &DatabaseConnection,
    user_id: Uuid,
    contact_id: Option<Uuid>,
    timestamp: DateTime<Utc>,
) {
    interactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        contact_id: Set(contact_id),
        timestamp: Set(timestamp),
    }
    .insert(conn)
    .await
    .expect("insert interaction");
}

/// Interaction row written with a raw timestamp text, the way other writers
/// of the table may store it.
pub async fn interaction_raw(
    conn: &DatabaseConnection,
    user_id: Uuid,
    contact_id: Option<Uuid>,
    timestamp: &str,
) {
    conn.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        r#"INSERT INTO interactions (id, user_id, contact_id, "timestamp") VALUES (?, ?, ?, ?)"#,
        [
            Uuid::new_v4().into(),
            user_id.into(),
            contact_id.into(),
            timestamp.into(),
        ],
    ))
    .await
    .expect("insert raw interaction");
}

pub async fn alert(conn: &DatabaseConnection, user_id: Uuid, read: bool) {
    alerts::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        read: Set(read),
    }
    .insert(conn)
    .await
    .expect("insert alert");
}

pub async fn reminder(conn: &DatabaseConnection, user_id: Uuid, completed: bool, enabled: bool) {
    reminders::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        completed: Set(completed),
        enabled: Set(enabled),
    }
    .insert(conn)
    .await
    .expect("insert reminder");
}
