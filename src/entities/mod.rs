//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget_item;
pub mod budget_item_occurrence;
pub mod category;
pub mod movement;
pub mod sea_orm_active_enums;
pub mod user;

// Re-export specific types to avoid conflicts
pub use budget_item::{
    Column as BudgetItemColumn, Entity as BudgetItem, Model as BudgetItemModel,
};
pub use budget_item_occurrence::{
    Column as OccurrenceColumn, Entity as BudgetItemOccurrence, Model as OccurrenceModel,
};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use movement::{Column as MovementColumn, Entity as Movement, Model as MovementModel};
pub use sea_orm_active_enums::{BudgetItemKind, Frequency, MovementKind, OccurrenceStatus};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
