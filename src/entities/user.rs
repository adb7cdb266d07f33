//! User entity - the owner of movements, budget items and custom categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique across users
    #[sea_orm(unique)]
    pub email: String,
    /// Display name
    pub name: String,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many movements
    #[sea_orm(has_many = "super::movement::Entity")]
    Movements,
    /// One user has many budget items
    #[sea_orm(has_many = "super::budget_item::Entity")]
    BudgetItems,
    /// One user has many custom categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
}

impl Related<super::movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItems.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
