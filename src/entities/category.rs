//! Category entity - named buckets that movements and budget items are filed under.
//!
//! Categories with no `user_id` are the shared defaults seeded from `config.toml`;
//! the rest are created on demand when a user files a movement under a new name.

use super::sea_orm_active_enums::MovementKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user, None for shared defaults
    pub user_id: Option<i64>,
    /// Display name (e.g., "Groceries", "Salary")
    pub name: String,
    /// Whether the category holds income or expenses
    pub kind: MovementKind,
    /// Optional emoji or icon name
    pub icon: Option<String>,
    /// Optional hex color (e.g., `#EF4444`)
    pub color: Option<String>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each custom category belongs to one user
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
