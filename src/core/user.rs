//! User business logic.
//!
//! Users own every movement, budget item and custom category. Authentication
//! is handled elsewhere; this module only stores the profile.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Creates a user after trimming and validating the email and name.
pub async fn create_user(db: &DatabaseConnection, email: &str, name: &str) -> Result<user::Model> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;

    let user = user::ActiveModel {
        email: Set(email),
        name: Set(name),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    Ok(user.insert(db).await?)
}

/// Finds a user by ID, returning None if not found.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by ID, failing with `UserNotFound` if it does not exist.
pub async fn require_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::UserNotFound { user_id })
}

/// Updates the profile fields that were provided.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<user::Model> {
    if name.is_none() && email.is_none() {
        return Err(Error::invalid("No fields to update"));
    }

    let mut active: user::ActiveModel = require_user(db, user_id).await?.into();
    if let Some(name) = name {
        active.name = Set(validate_name(name)?);
    }
    if let Some(email) = email {
        active.email = Set(validate_email(email)?);
    }

    Ok(active.update(db).await?)
}

fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid(format!("Invalid email: '{email}'")));
    }
    Ok(email.to_lowercase())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("User name cannot be empty"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_user(&db, "not-an-email", "Ana").await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let result = create_user(&db, "ana@example.com", "   ").await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_require_user() -> Result<()> {
        let db = setup_test_db().await?;

        let user = create_user(&db, "  Ana@Example.com ", " Ana ").await?;
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, "Ana");

        let found = require_user(&db, user.id).await?;
        assert_eq!(found, user);

        let missing = require_user(&db, user.id + 100).await;
        assert!(matches!(missing, Err(Error::UserNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db).await?;

        let updated = update_user(&db, user.id, Some("Renamed"), None).await?;
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, user.email);

        let empty = update_user(&db, user.id, None, None).await;
        assert!(matches!(empty, Err(Error::InvalidArgument { .. })));

        Ok(())
    }
}
