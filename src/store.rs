//! Read boundary between the projection service and persistence.
//!
//! The service only needs three reads. Keeping them behind a trait lets the
//! runner and tests swap in slow or failing stores without a database.

use crate::{
    core::{
        budget_item::list_budget_items,
        movement::{MovementFilter, list_movements},
        types::{BudgetItem, DateRange, Movement},
        user::get_user_by_id,
    },
    entities::user,
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// Source of users, budget items and movements.
#[async_trait]
pub trait FinanceStore: Send + Sync {
    /// Short name used in logs.
    fn backend_tag(&self) -> &'static str;

    /// Looks up a user, None when unknown.
    async fn find_user(&self, user_id: i64) -> Result<Option<user::Model>>;

    /// Every budget item the user owns, active or not.
    async fn list_budget_items(&self, user_id: i64) -> Result<Vec<BudgetItem>>;

    /// The user's movements, restricted to `range` when given.
    async fn list_movements(&self, user_id: i64, range: Option<DateRange>) -> Result<Vec<Movement>>;
}

/// `SeaORM`-backed store.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl FinanceStore for SeaOrmStore {
    fn backend_tag(&self) -> &'static str {
        "sea-orm"
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<user::Model>> {
        get_user_by_id(&self.db, user_id).await
    }

    async fn list_budget_items(&self, user_id: i64) -> Result<Vec<BudgetItem>> {
        list_budget_items(&self.db, user_id).await
    }

    async fn list_movements(&self, user_id: i64, range: Option<DateRange>) -> Result<Vec<Movement>> {
        let filter = range.map(MovementFilter::within).unwrap_or_default();
        list_movements(&self.db, user_id, &filter).await
    }
}
