use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The four dashboard counters for one user. Every field is zero when
/// nothing matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Distinct non-null contacts seen today (UTC).
    pub visitors: u64,
    /// All interactions of the user, any time.
    pub conversations: u64,
    pub unread_alerts: u64,
    /// Reminders that are neither completed nor disabled.
    pub upcoming_reminders: u64,
}

/// A logged exchange between the assistant and, optionally, a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `None` for system-originated interactions.
    pub contact_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}
