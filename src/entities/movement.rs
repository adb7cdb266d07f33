//! Movement entity - an actual, dated income or expense record.
//!
//! Amounts are stored as integer cents so SQLite never rounds them; the core
//! layer converts to `Decimal` at the boundary.

use super::sea_orm_active_enums::MovementKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Movement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    /// Unique identifier for the movement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Amount in cents, always positive; direction comes from `kind`
    pub amount_cents: i64,
    /// Category name the movement is filed under
    pub category: String,
    /// Free-form description
    pub description: String,
    /// Income or expense
    pub kind: MovementKind,
    /// Calendar date the movement happened
    pub movement_date: Date,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last corrected
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Movement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each movement belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
