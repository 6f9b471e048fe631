use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::contract::model::Interaction;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "interactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// `None` for system-originated interactions.
    pub contact_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Interaction {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            contact_id: m.contact_id,
            timestamp: m.timestamp,
        }
    }
}
