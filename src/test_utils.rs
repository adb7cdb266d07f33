//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        budget_item::{NewBudgetItem, create_budget_item},
        movement::{NewMovement, create_movement},
        types::{BudgetItem, DateRange, Movement},
        user,
    },
    entities::{self, BudgetItemKind, Frequency, MovementKind},
    errors::{Error, Result},
    store::FinanceStore,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a valid calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates the default test user (`ana@example.com`, "Ana").
pub async fn create_test_user(db: &DatabaseConnection) -> Result<entities::user::Model> {
    user::create_user(db, "ana@example.com", "Ana").await
}

/// Creates a user with a custom email and name.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, email, name).await
}

/// Creates a test movement with sensible defaults.
///
/// # Defaults
/// * `kind`: Expense
/// * `category`: "Groceries"
/// * `description`: "Test movement"
pub async fn create_test_movement(
    db: &DatabaseConnection,
    user_id: i64,
    amount: Decimal,
    movement_date: NaiveDate,
) -> Result<Movement> {
    create_custom_movement(
        db,
        user_id,
        MovementKind::Expense,
        amount,
        "Groceries",
        movement_date,
    )
    .await
}

/// Creates a test movement with custom parameters.
pub async fn create_custom_movement(
    db: &DatabaseConnection,
    user_id: i64,
    kind: MovementKind,
    amount: Decimal,
    category: &str,
    movement_date: NaiveDate,
) -> Result<Movement> {
    create_movement(
        db,
        user_id,
        NewMovement {
            amount,
            category: category.to_string(),
            description: "Test movement".to_string(),
            kind,
            movement_date,
        },
    )
    .await
}

/// Creates an open-ended monthly budget item.
///
/// # Defaults
/// * `category`: same as `name`
/// * `frequency`: Monthly
/// * `end_date`: None
pub async fn create_test_budget_item(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    kind: BudgetItemKind,
    amount: Decimal,
    start_date: NaiveDate,
) -> Result<BudgetItem> {
    create_custom_budget_item(
        db,
        user_id,
        name,
        kind,
        amount,
        Frequency::Monthly,
        start_date,
        None,
    )
    .await
}

/// Creates a budget item with custom parameters.
#[allow(clippy::too_many_arguments)]
pub async fn create_custom_budget_item(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    kind: BudgetItemKind,
    amount: Decimal,
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<BudgetItem> {
    create_budget_item(
        db,
        user_id,
        NewBudgetItem {
            name: name.to_string(),
            amount,
            kind,
            category: name.to_string(),
            frequency,
            start_date,
            end_date,
        },
    )
    .await
}

/// In-memory store for service and runner tests.
///
/// `fail` makes every read return `UpstreamUnavailable`; `delay` is slept
/// before each budget item read so tests can overlap requests.
#[derive(Debug, Default)]
pub struct FakeStore {
    /// Known users
    pub users: Vec<entities::user::Model>,
    /// Budget items of every user
    pub items: Vec<BudgetItem>,
    /// Movements of every user
    pub movements: Vec<Movement>,
    /// Fail every read
    pub fail: bool,
    /// Artificial latency on budget item reads
    pub delay: Duration,
    /// Number of `list_budget_items` calls
    pub fetch_calls: AtomicU64,
}

impl FakeStore {
    /// A store knowing a single user with the given ID.
    pub fn with_user(user_id: i64) -> Self {
        Self {
            users: vec![entities::user::Model {
                id: user_id,
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                created_at: chrono::Utc::now(),
            }],
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::UpstreamUnavailable {
                message: "fake store is down".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FinanceStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<entities::user::Model>> {
        self.check()?;
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn list_budget_items(&self, user_id: i64) -> Result<Vec<BudgetItem>> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.check()?;
        Ok(self
            .items
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_movements(&self, user_id: i64, range: Option<DateRange>) -> Result<Vec<Movement>> {
        self.check()?;
        Ok(self
            .movements
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| range.is_none_or(|r| r.contains(m.movement_date)))
            .cloned()
            .collect())
    }
}

/// A budget item value for store-free tests.
pub fn budget_item_value(
    user_id: i64,
    kind: BudgetItemKind,
    amount: Decimal,
    start_date: NaiveDate,
) -> BudgetItem {
    BudgetItem {
        id: 0,
        user_id,
        name: "Item".to_string(),
        amount,
        kind,
        category: "General".to_string(),
        frequency: Frequency::Monthly,
        start_date,
        end_date: None,
        is_active: true,
    }
}

/// A movement value for store-free tests.
pub fn movement_value(
    user_id: i64,
    kind: MovementKind,
    amount: Decimal,
    movement_date: NaiveDate,
) -> Movement {
    Movement {
        id: 0,
        user_id,
        amount,
        category: "General".to_string(),
        description: String::new(),
        kind,
        movement_date,
    }
}
