//! Recurring occurrences - turning budget items into real movements.
//!
//! Every active budget item falls due on the days its recurrence produces:
//! `start_date + 7k` for weekly items, the start day of every month for
//! monthly ones (clamped to shorter months) and the anniversary for yearly
//! ones. A due occurrence stays pending until the user approves it, which
//! records a movement copying the item, or skips it. Decisions are stored per
//! item and day, so each occurrence is decided at most once.

use crate::{
    core::{
        budget_item::{find_owned, list_active_budget_items},
        movement::{NewMovement, insert_movement},
        types::{BudgetItem, DateRange, Movement},
    },
    entities::{BudgetItemOccurrence, Frequency, OccurrenceStatus, budget_item_occurrence},
    errors::{Error, Result},
};
use chrono::{Days, Months, NaiveDate};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// A budget item occurrence waiting for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueOccurrence {
    /// The item that falls due
    pub item: BudgetItem,
    /// Day it falls due
    pub date: NaiveDate,
}

/// Days inside `range` on which `item` falls due, in ascending order.
///
/// The item's own interval bounds the result. Activity is not checked here.
#[must_use]
pub fn occurrence_dates(item: &BudgetItem, range: DateRange) -> Vec<NaiveDate> {
    let last = item.end_date.map_or(range.end(), |end| end.min(range.end()));
    let mut dates = Vec::new();
    for step in 0_u32.. {
        let Some(date) = nth_occurrence(item, step) else {
            break;
        };
        if date > last {
            break;
        }
        if date >= range.start() {
            dates.push(date);
        }
    }
    dates
}

/// Whether `item` falls due on `date`.
#[must_use]
pub fn is_occurrence(item: &BudgetItem, date: NaiveDate) -> bool {
    DateRange::new(date, date).is_ok_and(|day| !occurrence_dates(item, day).is_empty())
}

fn nth_occurrence(item: &BudgetItem, step: u32) -> Option<NaiveDate> {
    let start = item.start_date;
    match item.frequency {
        Frequency::Weekly => start.checked_add_days(Days::new(7 * u64::from(step))),
        Frequency::Monthly => start.checked_add_months(Months::new(step)),
        Frequency::Yearly => step
            .checked_mul(12)
            .and_then(|months| start.checked_add_months(Months::new(months))),
    }
}

/// Lists the user's pending occurrences falling due between `from` and `today`.
///
/// Only active items are considered. Results are ordered by date, then item name.
pub async fn list_due_occurrences(
    db: &DatabaseConnection,
    user_id: i64,
    from: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<DueOccurrence>> {
    let range = DateRange::new(from, today)?;
    let items = list_active_budget_items(db, user_id).await?;

    let decided: HashSet<(i64, NaiveDate)> = BudgetItemOccurrence::find()
        .filter(budget_item_occurrence::Column::UserId.eq(user_id))
        .filter(budget_item_occurrence::Column::OccurrenceDate.between(from, today))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.budget_item_id, d.occurrence_date))
        .collect();

    let mut due: Vec<DueOccurrence> = items
        .iter()
        .flat_map(|item| {
            occurrence_dates(item, range)
                .into_iter()
                .filter(|date| !decided.contains(&(item.id, *date)))
                .map(|date| DueOccurrence {
                    item: item.clone(),
                    date,
                })
        })
        .collect();
    due.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.item.name.cmp(&b.item.name)));
    Ok(due)
}

/// Lists the decisions recorded for one of the user's budget items, oldest first.
pub async fn list_occurrence_decisions(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
) -> Result<Vec<budget_item_occurrence::Model>> {
    find_owned(db, user_id, item_id).await?;
    BudgetItemOccurrence::find()
        .filter(budget_item_occurrence::Column::BudgetItemId.eq(item_id))
        .order_by_asc(budget_item_occurrence::Column::OccurrenceDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Approves an occurrence, recording a movement with the item's amount,
/// category and name on the occurrence date.
pub async fn approve_occurrence(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    date: NaiveDate,
) -> Result<Movement> {
    let txn = db.begin().await?;
    let item: BudgetItem = find_owned(&txn, user_id, item_id).await?.into();
    ensure_pending(&txn, &item, date).await?;

    let movement = insert_movement(
        &txn,
        user_id,
        NewMovement {
            amount: item.amount,
            category: item.category.clone(),
            description: item.name.clone(),
            kind: item.kind.movement_kind(),
            movement_date: date,
        },
    )
    .await?;
    record_decision(&txn, &item, date, OccurrenceStatus::Approved, Some(movement.id)).await?;
    txn.commit().await?;

    info!(
        "Approved '{}' on {} for user {} as movement {}",
        item.name, date, user_id, movement.id
    );
    Ok(movement)
}

/// Skips an occurrence without recording a movement.
pub async fn skip_occurrence(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    date: NaiveDate,
) -> Result<()> {
    let txn = db.begin().await?;
    let item: BudgetItem = find_owned(&txn, user_id, item_id).await?.into();
    ensure_pending(&txn, &item, date).await?;
    record_decision(&txn, &item, date, OccurrenceStatus::Skipped, None).await?;
    txn.commit().await?;

    info!("Skipped '{}' on {} for user {}", item.name, date, user_id);
    Ok(())
}

async fn ensure_pending<C>(conn: &C, item: &BudgetItem, date: NaiveDate) -> Result<()>
where
    C: ConnectionTrait,
{
    if !item.is_active {
        return Err(Error::invalid(format!("Budget item {} is inactive", item.id)));
    }
    if !is_occurrence(item, date) {
        return Err(Error::invalid(format!(
            "Budget item {} does not fall due on {date}",
            item.id
        )));
    }

    let existing = BudgetItemOccurrence::find()
        .filter(budget_item_occurrence::Column::BudgetItemId.eq(item.id))
        .filter(budget_item_occurrence::Column::OccurrenceDate.eq(date))
        .one(conn)
        .await?;
    match existing {
        Some(decision) => Err(Error::invalid(format!(
            "Occurrence of budget item {} on {date} was already {}",
            item.id, decision.status
        ))),
        None => Ok(()),
    }
}

async fn record_decision<C>(
    conn: &C,
    item: &BudgetItem,
    date: NaiveDate,
    status: OccurrenceStatus,
    movement_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let model = budget_item_occurrence::ActiveModel {
        user_id: Set(item.user_id),
        budget_item_id: Set(item.id),
        occurrence_date: Set(date),
        status: Set(status),
        movement_id: Set(movement_id),
        decided_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(conn).await?;
    Ok(())
}
