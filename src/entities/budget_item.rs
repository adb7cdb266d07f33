//! Budget item entity - a user-declared recurring income or projected expense.
//!
//! Items are soft-disabled through `is_active` and only hard-deleted on request.

use super::sea_orm_active_enums::{BudgetItemKind, Frequency};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    /// Unique identifier for the budget item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Human-readable name (e.g., "Salary", "Rent")
    pub name: String,
    /// Amount per occurrence in cents, always positive
    pub amount_cents: i64,
    /// Income or expense projection
    pub kind: BudgetItemKind,
    /// Category name the item is tracked against
    pub category: String,
    /// Recurrence
    pub frequency: Frequency,
    /// First day the item applies
    pub start_date: Date,
    /// Last day the item applies, None for open-ended
    pub end_date: Option<Date>,
    /// Soft-disable flag; inactive items never contribute to projections
    pub is_active: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between BudgetItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget item belongs to one user
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
