//! Dashboard aggregation over an explicit repository/session.

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::contract::model::DashboardStats;
use crate::domain::error::DomainError;
use crate::domain::repo::StatsRepository;

/// Midnight UTC of the day containing `now`.
pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Run the four counts for `user_id` against `repo`.
///
/// Either all four counts succeed or the first failure is returned.
pub async fn aggregate<R>(
    repo: &R,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<DashboardStats, DomainError>
where
    R: StatsRepository + ?Sized,
{
    let from = day_start(now);

    let visitors = repo
        .count_visitors(user_id, from, now)
        .await
        .map_err(DomainError::from_repo)?;
    let conversations = repo
        .count_conversations(user_id)
        .await
        .map_err(DomainError::from_repo)?;
    let unread_alerts = repo
        .count_unread_alerts(user_id)
        .await
        .map_err(DomainError::from_repo)?;
    let upcoming_reminders = repo
        .count_upcoming_reminders(user_id)
        .await
        .map_err(DomainError::from_repo)?;

    Ok(DashboardStats {
        visitors,
        conversations,
        unread_alerts,
        upcoming_reminders,
    })
}
