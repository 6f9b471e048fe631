//! Counting queries against a real (in-memory SQLite) schema.

mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use dashboard_stats::contract::model::DashboardStats;
use dashboard_stats::domain::aggregator::{aggregate, day_start};
use dashboard_stats::domain::repo::StatsRepository;
use dashboard_stats::domain::service::{Service, ServiceConfig};
use dashboard_stats::infra::storage::{SeaOrmSessionFactory, SeaOrmStatsRepository};
use uuid::Uuid;

fn noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn empty_user_gets_all_zeros() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;

    let repo = SeaOrmStatsRepository::new(conn);
    let stats = aggregate(&repo, user, noon()).await.unwrap();
    assert_eq!(stats, DashboardStats::default());
}

#[tokio::test]
async fn visitors_are_distinct_todays_contacts_and_conversations_are_all_time() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    let now = noon();
    let today = day_start(now);

    // Today: two distinct contacts and one system interaction.
    common::interaction(&conn, user, Some(Uuid::new_v4()), today + Duration::hours(1)).await;
    common::interaction(&conn, user, Some(Uuid::new_v4()), today + Duration::hours(2)).await;
    common::interaction(&conn, user, None, today + Duration::hours(3)).await;
    // Yesterday, with contacts.
    common::interaction(&conn, user, Some(Uuid::new_v4()), today - Duration::hours(1)).await;
    common::interaction(&conn, user, Some(Uuid::new_v4()), today - Duration::hours(20)).await;

    let repo = SeaOrmStatsRepository::new(conn);
    let stats = aggregate(&repo, user, now).await.unwrap();
    assert_eq!(stats.visitors, 2);
    assert_eq!(stats.conversations, 5);
}

#[tokio::test]
async fn repeat_contact_counts_once() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    let contact = Uuid::new_v4();
    let today = day_start(noon());

    for h in 1..=3 {
        common::interaction(&conn, user, Some(contact), today + Duration::hours(h)).await;
    }

    let repo = SeaOrmStatsRepository::new(conn);
    assert_eq!(repo.count_visitors(user, today, noon()).await.unwrap(), 1);
    assert_eq!(repo.count_conversations(user).await.unwrap(), 3);
}

#[tokio::test]
async fn window_bounds_are_inclusive() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    let now = noon();
    let today = day_start(now);

    common::interaction(&conn, user, Some(Uuid::new_v4()), today).await;
    common::interaction(&conn, user, Some(Uuid::new_v4()), now).await;
    // Later than `now`: outside the window.
    common::interaction(&conn, user, Some(Uuid::new_v4()), now + Duration::minutes(5)).await;

    let repo = SeaOrmStatsRepository::new(conn);
    assert_eq!(repo.count_visitors(user, today, now).await.unwrap(), 2);

    let listed = repo.list_interactions(user, today, now).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].timestamp <= listed[1].timestamp);
}

#[tokio::test]
async fn window_compares_time_not_text_layout() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    let now = noon();

    // Space-separated layout, same day as `now`.
    common::interaction_raw(&conn, user, Some(Uuid::new_v4()), "2024-05-14 10:00:00+00:00").await;
    // Previous day, and later than `now` on the same day.
    common::interaction_raw(&conn, user, Some(Uuid::new_v4()), "2024-05-13 23:59:59").await;
    common::interaction_raw(&conn, user, Some(Uuid::new_v4()), "2024-05-14 12:30:00").await;

    let repo = SeaOrmStatsRepository::new(conn);
    let stats = aggregate(&repo, user, now).await.unwrap();
    assert_eq!(stats.conversations, 3);
    assert_eq!(stats.visitors, 1);
}

#[tokio::test]
async fn alerts_of_other_users_are_never_counted() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user_a = common::user(&conn).await;
    let user_b = common::user(&conn).await;

    for _ in 0..3 {
        common::alert(&conn, user_b, false).await;
    }
    common::interaction(&conn, user_b, Some(Uuid::new_v4()), noon()).await;

    let repo = SeaOrmStatsRepository::new(conn);
    let a = aggregate(&repo, user_a, noon()).await.unwrap();
    assert_eq!(a.unread_alerts, 0);
    assert_eq!(a.visitors, 0);
    assert_eq!(a.conversations, 0);

    let b = aggregate(&repo, user_b, noon()).await.unwrap();
    assert_eq!(b.unread_alerts, 3);
}

#[tokio::test]
async fn only_unread_alerts_and_pending_enabled_reminders_count() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;

    common::alert(&conn, user, false).await;
    common::alert(&conn, user, true).await;

    common::reminder(&conn, user, false, true).await; // upcoming
    common::reminder(&conn, user, false, false).await; // disabled
    common::reminder(&conn, user, true, true).await; // done
    common::reminder(&conn, user, true, false).await;

    let repo = SeaOrmStatsRepository::new(conn);
    assert_eq!(repo.count_unread_alerts(user).await.unwrap(), 1);
    assert_eq!(repo.count_upcoming_reminders(user).await.unwrap(), 1);
}

#[tokio::test]
async fn service_runs_through_a_session() {
    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    let now = noon();
    common::interaction(&conn, user, Some(Uuid::new_v4()), day_start(now)).await;
    common::alert(&conn, user, false).await;

    let svc = Service::new(
        Arc::new(SeaOrmSessionFactory::new(conn)),
        ServiceConfig::default(),
    );
    let stats = svc.dashboard_at(user, now).await.unwrap();
    assert_eq!(
        stats,
        DashboardStats {
            visitors: 1,
            conversations: 1,
            unread_alerts: 1,
            upcoming_reminders: 0,
        }
    );

    // The single pooled connection was handed back.
    let again = svc.dashboard_at(user, now).await.unwrap();
    assert_eq!(again, stats);
}

#[tokio::test]
async fn missing_table_fails_the_whole_request() {
    use sea_orm::ConnectionTrait;

    let db = common::migrated_db().await;
    let conn = db.sea();
    let user = common::user(&conn).await;
    conn.execute_unprepared("DROP TABLE reminders").await.unwrap();

    let svc = Service::new(
        Arc::new(SeaOrmSessionFactory::new(conn)),
        ServiceConfig::default(),
    );
    let err = svc.dashboard_at(user, noon()).await.unwrap_err();
    assert!(err.to_string().contains("count_upcoming_reminders"));

    // The failed session was released; the single connection is usable again.
    let repo = SeaOrmStatsRepository::new(db.sea());
    assert_eq!(repo.count_conversations(user).await.unwrap(), 0);
}
