//! Budget item business logic - Handles recurring income and projected expense declarations.
//!
//! Provides functions for creating, retrieving, updating, soft-disabling and deleting
//! budget items. Validation enforces a strictly positive amount, non-empty name and
//! category, and `start_date <= end_date` whenever an end date is present. Updates are
//! validated against the merged record so a partial edit can never leave an item with
//! an inverted interval.

use crate::{
    core::{
        category::get_or_create_category,
        money::{require_positive, to_cents},
        types::{BudgetItem, DateRange},
    },
    entities::{BudgetItemKind, BudgetItemOccurrence, Frequency, budget_item, budget_item_occurrence},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Fields for a new budget item.
#[derive(Debug, Clone)]
pub struct NewBudgetItem {
    /// Display name
    pub name: String,
    /// Amount per occurrence, must be positive
    pub amount: Decimal,
    /// Income or expense projection
    pub kind: BudgetItemKind,
    /// Category name, created for the user if missing
    pub category: String,
    /// Recurrence
    pub frequency: Frequency,
    /// First day the item applies
    pub start_date: NaiveDate,
    /// Last day the item applies, None for open-ended
    pub end_date: Option<NaiveDate>,
}

/// Edits to apply to a budget item; absent fields are left alone.
///
/// `end_date` is doubly optional: `Some(None)` makes the item open-ended.
#[derive(Debug, Clone, Default)]
pub struct BudgetItemUpdate {
    /// New name
    pub name: Option<String>,
    /// New amount
    pub amount: Option<Decimal>,
    /// New kind
    pub kind: Option<BudgetItemKind>,
    /// New category
    pub category: Option<String>,
    /// New frequency
    pub frequency: Option<Frequency>,
    /// New start date
    pub start_date: Option<NaiveDate>,
    /// New end date, or `Some(None)` to clear it
    pub end_date: Option<Option<NaiveDate>>,
}

impl BudgetItemUpdate {
    const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.frequency.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Creates an active budget item for `user_id`.
pub async fn create_budget_item(
    db: &DatabaseConnection,
    user_id: i64,
    new: NewBudgetItem,
) -> Result<BudgetItem> {
    let name = validate_name(&new.name)?;
    let amount = require_positive(new.amount)?;
    validate_interval(new.start_date, new.end_date)?;

    let txn = db.begin().await?;
    let category =
        get_or_create_category(&txn, user_id, &new.category, new.kind.movement_kind()).await?;

    let now = chrono::Utc::now();
    let model = budget_item::ActiveModel {
        user_id: Set(user_id),
        name: Set(name),
        amount_cents: Set(to_cents(amount)?),
        kind: Set(new.kind),
        category: Set(category.name),
        frequency: Set(new.frequency),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let inserted = model.insert(&txn).await?;
    txn.commit().await?;

    info!(
        "Created {} budget item '{}' for user {}",
        inserted.frequency, inserted.name, user_id
    );
    Ok(inserted.into())
}

/// Finds one of the user's budget items, failing with `BudgetItemNotFound`.
pub async fn get_budget_item(db: &DatabaseConnection, user_id: i64, item_id: i64) -> Result<BudgetItem> {
    find_owned(db, user_id, item_id).await.map(Into::into)
}

/// Lists all of the user's budget items, active or not, ordered by start date then name.
pub async fn list_budget_items(db: &DatabaseConnection, user_id: i64) -> Result<Vec<BudgetItem>> {
    let models = crate::entities::BudgetItem::find()
        .filter(budget_item::Column::UserId.eq(user_id))
        .order_by_asc(budget_item::Column::StartDate)
        .order_by_asc(budget_item::Column::Name)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

/// Lists only the user's active budget items.
pub async fn list_active_budget_items(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<BudgetItem>> {
    let models = crate::entities::BudgetItem::find()
        .filter(budget_item::Column::UserId.eq(user_id))
        .filter(budget_item::Column::IsActive.eq(true))
        .order_by_asc(budget_item::Column::StartDate)
        .order_by_asc(budget_item::Column::Name)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

/// Applies an edit after validating the merged result.
pub async fn update_budget_item(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    changes: BudgetItemUpdate,
) -> Result<BudgetItem> {
    if changes.is_empty() {
        return Err(Error::invalid("No fields to update"));
    }

    let txn = db.begin().await?;
    let current = find_owned(&txn, user_id, item_id).await?;

    let start_date = changes.start_date.unwrap_or(current.start_date);
    let end_date = changes.end_date.unwrap_or(current.end_date);
    validate_interval(start_date, end_date)?;
    let kind = changes.kind.unwrap_or(current.kind);
    let category_changed = changes.category.is_some() || changes.kind.is_some();
    let category_name = changes.category.unwrap_or_else(|| current.category.clone());

    let mut active: budget_item::ActiveModel = current.into();
    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(amount) = changes.amount {
        active.amount_cents = Set(to_cents(require_positive(amount)?)?);
    }
    if category_changed {
        let category =
            get_or_create_category(&txn, user_id, &category_name, kind.movement_kind()).await?;
        active.category = Set(category.name);
        active.kind = Set(kind);
    }
    if let Some(frequency) = changes.frequency {
        active.frequency = Set(frequency);
    }
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Updated budget item {} for user {}", item_id, user_id);
    Ok(updated.into())
}

/// Soft-disables (or re-enables) a budget item.
pub async fn set_budget_item_active(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    is_active: bool,
) -> Result<BudgetItem> {
    let mut active: budget_item::ActiveModel = find_owned(db, user_id, item_id).await?.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    info!(
        "Budget item {} for user {} is now {}",
        item_id,
        user_id,
        if is_active { "active" } else { "inactive" }
    );
    Ok(updated.into())
}

/// Permanently deletes a budget item.
///
/// Approve and skip decisions recorded for the item go with it; movements
/// created by approvals are kept.
pub async fn delete_budget_item(db: &DatabaseConnection, user_id: i64, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let item = find_owned(&txn, user_id, item_id).await?;
    BudgetItemOccurrence::delete_many()
        .filter(budget_item_occurrence::Column::BudgetItemId.eq(item_id))
        .exec(&txn)
        .await?;
    item.delete(&txn).await?;
    txn.commit().await?;
    info!("Deleted budget item {} for user {}", item_id, user_id);
    Ok(())
}

fn validate_interval(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    if let Some(end) = end {
        DateRange::new(start, end)?;
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("Budget item name cannot be empty"));
    }
    Ok(name.to_string())
}

pub(crate) async fn find_owned<C>(db: &C, user_id: i64, item_id: i64) -> Result<budget_item::Model>
where
    C: ConnectionTrait,
{
    crate::entities::BudgetItem::find_by_id(item_id)
        .filter(budget_item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::BudgetItemNotFound { id: item_id })
}
