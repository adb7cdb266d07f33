//! Core business logic.
//!
//! The projection engine and reports are pure functions over domain values;
//! the remaining modules persist users, categories, movements and budget
//! items through `SeaORM`.

/// Budget item CRUD and soft-disable
pub mod budget_item;
/// Category listing, seeding and lookup
pub mod category;
/// Decimal money helpers
pub mod money;
/// Calendar month keys
pub mod month;
/// Movement CRUD, filters and summaries
pub mod movement;
/// Budget usage against projected expenses
pub mod progress;
/// Month-by-month projection engine
pub mod projection;
/// Due budget item occurrences and their approval
pub mod recurring;
/// Domain values shared across layers
pub mod types;
/// User profiles
pub mod user;
