//! SeaORM entities for the tables the dashboard reads.

use sea_orm::{IdenStatic, Iterable};

pub mod alerts;
pub mod interactions;
pub mod reminders;
pub mod users;

/// Static column listing of an entity, keyed by table name.
///
/// `None` when no entity maps to `table`.
pub fn column_names(table: &str) -> Option<Vec<String>> {
    fn names<C: Iterable + IdenStatic>() -> Vec<String> {
        C::iter().map(|c| c.as_str().to_owned()).collect()
    }

    match table {
        "users" => Some(names::<users::Column>()),
        "interactions" => Some(names::<interactions::Column>()),
        "alerts" => Some(names::<alerts::Column>()),
        "reminders" => Some(names::<reminders::Column>()),
        _ => None,
    }
}
