//! Movement business logic - recording, correcting and listing actual income and expenses.
//!
//! Every lookup is scoped to the owning user: a movement that exists but belongs
//! to someone else is reported as not found. Amounts are validated as strictly
//! positive; the direction is carried by the movement kind.

use crate::{
    core::{
        category::get_or_create_category,
        money::{require_positive, to_cents},
        types::{DateRange, Movement},
    },
    entities::{MovementKind, movement},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::info;

/// Fields for a new movement.
#[derive(Debug, Clone)]
pub struct NewMovement {
    /// Amount, must be positive
    pub amount: Decimal,
    /// Category name, created for the user if missing
    pub category: String,
    /// Free-form description
    pub description: String,
    /// Income or expense
    pub kind: MovementKind,
    /// When it happened
    pub movement_date: NaiveDate,
}

/// Corrections to apply to a movement; absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct MovementUpdate {
    /// New amount
    pub amount: Option<Decimal>,
    /// New category name
    pub category: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New kind
    pub kind: Option<MovementKind>,
    /// New date
    pub movement_date: Option<NaiveDate>,
}

impl MovementUpdate {
    const fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.movement_date.is_none()
    }
}

/// Optional filters for [`list_movements`]. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Only this kind
    pub kind: Option<MovementKind>,
    /// Only this category name
    pub category: Option<String>,
    /// On or after this date
    pub date_from: Option<NaiveDate>,
    /// On or before this date
    pub date_to: Option<NaiveDate>,
    /// At least this amount
    pub amount_min: Option<Decimal>,
    /// At most this amount
    pub amount_max: Option<Decimal>,
}

impl MovementFilter {
    /// A filter matching every movement inside `range`.
    #[must_use]
    pub fn within(range: DateRange) -> Self {
        Self {
            date_from: Some(range.start()),
            date_to: Some(range.end()),
            ..Self::default()
        }
    }
}

/// Income, expenses and balance over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    /// Sum of income movements
    pub total_income: Decimal,
    /// Sum of expense movements
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`
    pub balance: Decimal,
    /// Number of movements considered
    pub movement_count: usize,
}

/// Records a movement for `user_id`, creating its category on first use.
pub async fn create_movement(
    db: &DatabaseConnection,
    user_id: i64,
    new: NewMovement,
) -> Result<Movement> {
    let txn = db.begin().await?;
    let inserted = insert_movement(&txn, user_id, new).await?;
    txn.commit().await?;

    info!(
        "Recorded {} of {} for user {} on {}",
        inserted.kind, inserted.amount, user_id, inserted.movement_date
    );
    Ok(inserted)
}

/// Validates and inserts a movement on `conn`, which may be a transaction.
pub(crate) async fn insert_movement<C>(conn: &C, user_id: i64, new: NewMovement) -> Result<Movement>
where
    C: ConnectionTrait,
{
    let amount = require_positive(new.amount)?;
    let category = get_or_create_category(conn, user_id, &new.category, new.kind).await?;

    let now = chrono::Utc::now();
    let model = movement::ActiveModel {
        user_id: Set(user_id),
        amount_cents: Set(to_cents(amount)?),
        category: Set(category.name),
        description: Set(new.description.trim().to_string()),
        kind: Set(new.kind),
        movement_date: Set(new.movement_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(conn).await?.into())
}

/// Finds one of the user's movements, failing with `MovementNotFound`.
pub async fn get_movement(db: &DatabaseConnection, user_id: i64, movement_id: i64) -> Result<Movement> {
    find_owned(db, user_id, movement_id).await.map(Into::into)
}

/// Lists the user's movements matching `filter`, newest first.
pub async fn list_movements(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &MovementFilter,
) -> Result<Vec<Movement>> {
    let mut query = crate::entities::Movement::find().filter(movement::Column::UserId.eq(user_id));

    if let Some(kind) = filter.kind {
        query = query.filter(movement::Column::Kind.eq(kind));
    }
    if let Some(category) = &filter.category {
        query = query.filter(movement::Column::Category.eq(category.trim()));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(movement::Column::MovementDate.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(movement::Column::MovementDate.lte(to));
    }
    if let Some(min) = filter.amount_min {
        query = query.filter(movement::Column::AmountCents.gte(to_cents(min)?));
    }
    if let Some(max) = filter.amount_max {
        query = query.filter(movement::Column::AmountCents.lte(to_cents(max)?));
    }

    let models = query
        .order_by_desc(movement::Column::MovementDate)
        .order_by_desc(movement::Column::Id)
        .all(db)
        .await?;

    Ok(models.into_iter().map(Into::into).collect())
}

/// Applies a user correction to a movement.
pub async fn update_movement(
    db: &DatabaseConnection,
    user_id: i64,
    movement_id: i64,
    changes: MovementUpdate,
) -> Result<Movement> {
    if changes.is_empty() {
        return Err(Error::invalid("No fields to update"));
    }

    let txn = db.begin().await?;
    let current = find_owned(&txn, user_id, movement_id).await?;
    let kind = changes.kind.unwrap_or(current.kind);
    let category_changed = changes.category.is_some() || changes.kind.is_some();
    let category_name = changes.category.unwrap_or_else(|| current.category.clone());
    let mut active: movement::ActiveModel = current.into();

    if let Some(amount) = changes.amount {
        active.amount_cents = Set(to_cents(require_positive(amount)?)?);
    }
    if category_changed {
        let category = get_or_create_category(&txn, user_id, &category_name, kind).await?;
        active.category = Set(category.name);
    }
    if let Some(description) = changes.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(new_kind) = changes.kind {
        active.kind = Set(new_kind);
    }
    if let Some(date) = changes.movement_date {
        active.movement_date = Set(date);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Updated movement {} for user {}", movement_id, user_id);
    Ok(updated.into())
}

/// Deletes one of the user's movements.
pub async fn delete_movement(db: &DatabaseConnection, user_id: i64, movement_id: i64) -> Result<()> {
    let movement = find_owned(db, user_id, movement_id).await?;
    movement.delete(db).await?;
    info!("Deleted movement {} for user {}", movement_id, user_id);
    Ok(())
}

/// Totals the user's movements, optionally bounded by dates.
pub async fn financial_summary(
    db: &DatabaseConnection,
    user_id: i64,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<FinancialSummary> {
    if let (Some(from), Some(to)) = (date_from, date_to) {
        DateRange::new(from, to)?;
    }

    let filter = MovementFilter {
        date_from,
        date_to,
        ..MovementFilter::default()
    };
    let movements = list_movements(db, user_id, &filter).await?;
    Ok(summarize(&movements))
}

/// Totals a slice of movements.
#[must_use]
pub fn summarize(movements: &[Movement]) -> FinancialSummary {
    let (income, expenses) = movements
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), m| match m.kind {
            MovementKind::Income => (inc + m.amount, exp),
            MovementKind::Expense => (inc, exp + m.amount),
        });

    FinancialSummary {
        total_income: income,
        total_expenses: expenses,
        balance: income - expenses,
        movement_count: movements.len(),
    }
}

async fn find_owned<C>(db: &C, user_id: i64, movement_id: i64) -> Result<movement::Model>
where
    C: ConnectionTrait,
{
    crate::entities::Movement::find_by_id(movement_id)
        .filter(movement::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::MovementNotFound { id: movement_id })
}
