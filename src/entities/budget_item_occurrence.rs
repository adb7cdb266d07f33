//! Budget item occurrence entity - the user's decision on one due occurrence.
//!
//! A row exists only once an occurrence was approved or skipped; pending
//! occurrences are computed from the budget item's recurrence.

use super::sea_orm_active_enums::OccurrenceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occurrence decision database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_item_occurrences")]
pub struct Model {
    /// Unique identifier for the decision
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Budget item the occurrence belongs to
    pub budget_item_id: i64,
    /// Day the occurrence falls on
    pub occurrence_date: Date,
    /// Approved or skipped
    pub status: OccurrenceStatus,
    /// Movement recorded on approval
    pub movement_id: Option<i64>,
    /// When the decision was made
    pub decided_at: DateTimeUtc,
}

/// Defines relationships between occurrences and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each occurrence belongs to one budget item
    #[sea_orm(
        belongs_to = "super::budget_item::Entity",
        from = "Column::BudgetItemId",
        to = "super::budget_item::Column::Id"
    )]
    BudgetItem,
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
