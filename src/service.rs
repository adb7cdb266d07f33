//! Projection service: validates requests, loads data through a
//! [`FinanceStore`] and runs the pure engine over it.

use crate::{
    core::{
        month::MonthKey,
        progress::{BudgetUsageSummary, budget_usage},
        projection::{
            ProjectionOptions, ProjectionReport, ProjectionRequest, project, validate_horizon,
            window_range,
        },
        types::DateRange,
    },
    entities::user,
    errors::{Error, Result},
    store::FinanceStore,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Entry point for projection and budget usage queries.
#[derive(Clone)]
pub struct ProjectionService {
    store: Arc<dyn FinanceStore>,
    options: ProjectionOptions,
}

impl ProjectionService {
    /// Creates a service reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn FinanceStore>, options: ProjectionOptions) -> Self {
        Self { store, options }
    }

    /// Engine options in effect.
    #[must_use]
    pub const fn options(&self) -> ProjectionOptions {
        self.options
    }

    /// Projects the window ending at the current local month.
    pub async fn project(&self, request: ProjectionRequest) -> Result<ProjectionReport> {
        self.project_at(request, chrono::Local::now().date_naive())
            .await
    }

    /// Projects the window ending at `today`'s month.
    ///
    /// The horizon is validated before any read, so a bad request never
    /// touches the store. Store failures are returned unchanged.
    #[instrument(skip(self), fields(backend = self.store.backend_tag()))]
    pub async fn project_at(
        &self,
        request: ProjectionRequest,
        today: NaiveDate,
    ) -> Result<ProjectionReport> {
        let horizon = validate_horizon(request.horizon_months, self.options.max_horizon_months)?;
        self.require_user(request.user_id).await?;

        let range = window_range(today, horizon);
        let items = self.store.list_budget_items(request.user_id).await?;
        let movements = self
            .store
            .list_movements(request.user_id, Some(range))
            .await?;
        debug!(
            "Loaded {} budget items and {} movements between {} and {}",
            items.len(),
            movements.len(),
            range.start(),
            range.end()
        );

        let report = project(&items, &movements, today, request.horizon_months, &self.options)?;
        info!(
            "Projected {} month(s) for user {}",
            report.period_months, request.user_id
        );
        Ok(report)
    }

    /// Budget usage for `today`'s month.
    #[instrument(skip(self), fields(backend = self.store.backend_tag()))]
    pub async fn budget_usage_at(&self, user_id: i64, today: NaiveDate) -> Result<BudgetUsageSummary> {
        self.require_user(user_id).await?;

        let month = MonthKey::from_date(today);
        let range = DateRange::spanning(month, month);
        let items = self.store.list_budget_items(user_id).await?;
        let movements = self.store.list_movements(user_id, Some(range)).await?;

        Ok(budget_usage(
            &items,
            &movements,
            today,
            self.options.weekly_policy,
        ))
    }

    /// Resolves a user or fails with `UserNotFound`.
    pub async fn require_user(&self, user_id: i64) -> Result<user::Model> {
        match self.store.find_user(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(Error::UserNotFound { user_id }),
            Err(e) => {
                warn!("Store lookup for user {} failed: {}", user_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        entities::{BudgetItemKind, MovementKind},
        errors::ErrorKind,
        store::SeaOrmStore,
        test_utils::*,
    };
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;

    fn service(store: FakeStore) -> ProjectionService {
        ProjectionService::new(Arc::new(store), ProjectionOptions::default())
    }

    fn request(user_id: i64, horizon_months: i64) -> ProjectionRequest {
        ProjectionRequest {
            user_id,
            horizon_months,
        }
    }

    #[tokio::test]
    async fn test_project_from_fake_store() {
        let mut store = FakeStore::with_user(7);
        store.items.push(budget_item_value(
            7,
            BudgetItemKind::RecurringIncome,
            dec!(1000),
            date(2026, 1, 1),
        ));
        store.movements.push(movement_value(
            7,
            MovementKind::Expense,
            dec!(40),
            date(2026, 10, 2),
        ));
        // Outside the three-month window
        store.movements.push(movement_value(
            7,
            MovementKind::Expense,
            dec!(99),
            date(2026, 7, 31),
        ));

        let report = service(store)
            .project_at(request(7, 3), date(2026, 10, 19))
            .await
            .unwrap();

        assert_eq!(report.period_months, 3);
        assert_eq!(report.totals.projected_income, dec!(3000));
        assert_eq!(report.totals.actual_expenses, dec!(40));
    }

    #[tokio::test]
    async fn test_invalid_horizon_does_not_touch_store() {
        let store = Arc::new(FakeStore::with_user(7));
        let service = ProjectionService::new(Arc::clone(&store) as Arc<dyn FinanceStore>, ProjectionOptions::default());

        for horizon in [0, -3, 121] {
            let err = service
                .project_at(request(7, horizon), date(2026, 10, 19))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert_eq!(store.fetch_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let err = service(FakeStore::with_user(7))
            .project_at(request(8, 3), date(2026, 10, 19))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound { user_id: 8 }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_store_failure_is_retryable() {
        let store = FakeStore {
            fail: true,
            ..FakeStore::with_user(7)
        };
        let err = service(store)
            .project_at(request(7, 3), date(2026, 10, 19))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_project_against_database() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db).await?;
        create_test_budget_item(
            &db,
            user.id,
            "Rent",
            BudgetItemKind::ProjectedExpense,
            dec!(900),
            date(2026, 9, 1),
        )
        .await?;
        create_test_movement(&db, user.id, dec!(120), date(2026, 10, 5)).await?;

        let service = ProjectionService::new(
            Arc::new(SeaOrmStore::new(db)),
            ProjectionOptions::default(),
        );
        let report = service
            .project_at(request(user.id, 2), date(2026, 10, 19))
            .await?;

        assert_eq!(report.totals.projected_expenses, dec!(1800));
        assert_eq!(report.totals.actual_expenses, dec!(120));
        assert_eq!(report.projections[1].actual_balance, dec!(-120));
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_usage_at() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db).await?;
        create_test_budget_item(
            &db,
            user.id,
            "Groceries",
            BudgetItemKind::ProjectedExpense,
            dec!(400),
            date(2026, 1, 1),
        )
        .await?;
        create_test_movement(&db, user.id, dec!(100), date(2026, 10, 5)).await?;
        create_test_movement(&db, user.id, dec!(300), date(2026, 9, 5)).await?;

        let service = ProjectionService::new(
            Arc::new(SeaOrmStore::new(db)),
            ProjectionOptions::default(),
        );
        let summary = service.budget_usage_at(user.id, date(2026, 10, 19)).await?;

        assert_eq!(summary.total_budgets, 1);
        assert_eq!(summary.budgets[0].spent, dec!(100));
        assert_eq!(summary.budgets[0].percentage_used, dec!(25));
        Ok(())
    }
}
