//! Explicit session state: which user the current caller acts as.

use crate::{
    entities::user,
    errors::{Error, Result},
    store::FinanceStore,
};
use tracing::info;

/// The user a caller is acting as, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<user::Model>,
}

impl Session {
    /// Resolves `user_id` through `store`, failing with `UserNotFound`.
    pub async fn load(store: &dyn FinanceStore, user_id: i64) -> Result<Self> {
        let user = store
            .find_user(user_id)
            .await?
            .ok_or(Error::UserNotFound { user_id })?;
        info!("Session started for user {}", user.id);
        Ok(Self { user: Some(user) })
    }

    /// The loaded user.
    #[must_use]
    pub const fn user(&self) -> Option<&user::Model> {
        self.user.as_ref()
    }

    /// The loaded user's ID, or `NoActiveSession`.
    pub fn require_user_id(&self) -> Result<i64> {
        self.user
            .as_ref()
            .map(|user| user.id)
            .ok_or(Error::NoActiveSession)
    }

    /// Forgets the loaded user.
    pub fn clear(&mut self) {
        self.user = None;
    }
}
