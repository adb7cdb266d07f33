//! Category business logic.
//!
//! A user sees the shared default categories plus the ones they created.
//! Movements and budget items reference categories by name, and a missing
//! name is created on first use through [`get_or_create_category`].

use crate::{
    config::settings::CategorySeed,
    entities::{Category, MovementKind, category},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Lists the defaults plus the user's own categories, optionally filtered by kind.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: Option<i64>,
    kind: Option<MovementKind>,
) -> Result<Vec<category::Model>> {
    let mut owner = Condition::any().add(category::Column::UserId.is_null());
    if let Some(user_id) = user_id {
        owner = owner.add(category::Column::UserId.eq(user_id));
    }

    let mut query = Category::find().filter(owner);
    if let Some(kind) = kind {
        query = query.filter(category::Column::Kind.eq(kind));
    }

    query
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by ID, failing with `CategoryNotFound`.
pub async fn get_category_by_id(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })
}

/// Returns the category visible to `user_id` with this name and kind, creating
/// a user-owned one if none exists.
pub async fn get_or_create_category<C>(
    db: &C,
    user_id: i64,
    name: &str,
    kind: MovementKind,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let name = validate_name(name)?;

    let existing = Category::find()
        .filter(category::Column::Name.eq(name.as_str()))
        .filter(category::Column::Kind.eq(kind))
        .filter(
            Condition::any()
                .add(category::Column::UserId.is_null())
                .add(category::Column::UserId.eq(user_id)),
        )
        .one(db)
        .await?;

    if let Some(category) = existing {
        return Ok(category);
    }

    debug!("Creating category '{}' ({}) for user {}", name, kind, user_id);
    let category = category::ActiveModel {
        user_id: Set(Some(user_id)),
        name: Set(name),
        kind: Set(kind),
        icon: Set(None),
        color: Set(None),
        ..Default::default()
    };
    Ok(category.insert(db).await?)
}

/// Creates a category. `user_id` None creates a shared default.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: Option<i64>,
    name: &str,
    kind: MovementKind,
    icon: Option<String>,
    color: Option<String>,
) -> Result<category::Model> {
    let category = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(validate_name(name)?),
        kind: Set(kind),
        icon: Set(icon),
        color: Set(color),
        ..Default::default()
    };
    Ok(category.insert(db).await?)
}

/// Changes to apply to a category; absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New name
    pub name: Option<String>,
    /// New kind
    pub kind: Option<MovementKind>,
    /// New icon
    pub icon: Option<String>,
    /// New color
    pub color: Option<String>,
}

/// Updates a category. An empty update returns the category unchanged.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    changes: CategoryUpdate,
) -> Result<category::Model> {
    let current = get_category_by_id(db, category_id).await?;
    if changes.name.is_none()
        && changes.kind.is_none()
        && changes.icon.is_none()
        && changes.color.is_none()
    {
        return Ok(current);
    }

    let mut active: category::ActiveModel = current.into();
    if let Some(name) = changes.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(kind) = changes.kind {
        active.kind = Set(kind);
    }
    if let Some(icon) = changes.icon {
        active.icon = Set(Some(icon));
    }
    if let Some(color) = changes.color {
        active.color = Set(Some(color));
    }
    Ok(active.update(db).await?)
}

/// Deletes a category, returning whether a row was removed.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<bool> {
    let result = Category::delete_by_id(category_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Inserts the shared default categories that are not present yet.
///
/// Returns the number of categories created.
pub async fn seed_default_categories(db: &DatabaseConnection, seeds: &[CategorySeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        let exists = Category::find()
            .filter(category::Column::UserId.is_null())
            .filter(category::Column::Name.eq(seed.name.as_str()))
            .filter(category::Column::Kind.eq(seed.kind))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        create_category(
            db,
            None,
            &seed.name,
            seed.kind,
            seed.icon.clone(),
            seed.color.clone(),
        )
        .await?;
        created += 1;
    }

    info!("Seeded {} default categories ({} configured)", created, seeds.len());
    Ok(created)
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("Category name cannot be empty"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn seed(name: &str, kind: MovementKind) -> CategorySeed {
        CategorySeed {
            name: name.to_string(),
            kind,
            icon: None,
            color: Some("#10B981".to_string()),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            seed("Salary", MovementKind::Income),
            seed("Groceries", MovementKind::Expense),
        ];

        assert_eq!(seed_default_categories(&db, &seeds).await?, 2);
        assert_eq!(seed_default_categories(&db, &seeds).await?, 0);

        let all = list_categories(&db, None, None).await?;
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|c| c.user_id.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_prefers_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db).await?;
        seed_default_categories(&db, &[seed("Groceries", MovementKind::Expense)]).await?;

        let found = get_or_create_category(&db, user.id, " Groceries ", MovementKind::Expense).await?;
        assert!(found.user_id.is_none());

        let created = get_or_create_category(&db, user.id, "Pets", MovementKind::Expense).await?;
        assert_eq!(created.user_id, Some(user.id));

        let again = get_or_create_category(&db, user.id, "Pets", MovementKind::Expense).await?;
        assert_eq!(again.id, created.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_kind() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_user(&db).await?;
        let bo = create_custom_user(&db, "bo@example.com", "Bo").await?;

        seed_default_categories(&db, &[seed("Salary", MovementKind::Income)]).await?;
        get_or_create_category(&db, ana.id, "Freelance", MovementKind::Income).await?;
        get_or_create_category(&db, bo.id, "Garden", MovementKind::Expense).await?;

        let ana_income = list_categories(&db, Some(ana.id), Some(MovementKind::Income)).await?;
        let names: Vec<&str> = ana_income.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Freelance", "Salary"]);

        let ana_expense = list_categories(&db, Some(ana.id), Some(MovementKind::Expense)).await?;
        assert!(ana_expense.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_category() -> Result<()> {
        let db = setup_test_db().await?;
        let category =
            create_category(&db, None, "Travel", MovementKind::Expense, None, None).await?;

        let unchanged = update_category(&db, category.id, CategoryUpdate::default()).await?;
        assert_eq!(unchanged, category);

        let updated = update_category(
            &db,
            category.id,
            CategoryUpdate {
                icon: Some("plane".to_string()),
                ..CategoryUpdate::default()
            },
        )
        .await?;
        assert_eq!(updated.icon.as_deref(), Some("plane"));
        assert_eq!(updated.name, "Travel");

        assert!(delete_category(&db, category.id).await?);
        assert!(!delete_category(&db, category.id).await?);
        assert!(matches!(
            get_category_by_id(&db, category.id).await,
            Err(Error::CategoryNotFound { .. })
        ));

        Ok(())
    }
}
