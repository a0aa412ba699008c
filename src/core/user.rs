//! User business logic - staff accounts.

use crate::{
    core::clean_name,
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::info;

/// Fields needed to create a user account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// A plain active account with only a username.
    #[must_use]
    pub fn with_username(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Self::default()
        }
    }
}

/// Creates an active user account.
///
/// # Errors
/// Returns [`Error::DuplicateUsername`] if the username is taken, or a configuration
/// error if it is empty.
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let username = clean_name(&new_user.username, "Username")?;

    if get_user_by_username(db, &username).await?.is_some() {
        return Err(Error::DuplicateUsername { username });
    }

    let user = user::ActiveModel {
        username: Set(username.clone()),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        email: Set(new_user.email),
        is_staff: Set(new_user.is_staff),
        is_active: Set(true),
        is_superuser: Set(new_user.is_superuser),
        date_joined: Set(Utc::now()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateUsername {
            username: username.clone(),
        },
        _ => e.into(),
    })?;

    info!(user_id = user.id, "Created user {}", user);
    Ok(user)
}

/// Finds a user by exact username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user by ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Lists active users ordered by username.
pub async fn list_active_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    get_user_by_username(db, username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.to_string(),
        })
}

/// Deactivates an account. The record is kept.
pub async fn deactivate_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let mut user: user::ActiveModel = find_user(db, username).await?.into();
    user.is_active = Set(false);
    let user = user.update(db).await?;
    info!(user_id = user.id, "Deactivated user {}", user);
    Ok(user)
}

/// Stamps the last login time of an account.
pub async fn record_login(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let mut user: user::ActiveModel = find_user(db, username).await?.into();
    user.last_login = Set(Some(Utc::now()));
    user.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_user() -> Result<()> {
        let db = setup_test_db().await?;

        let user = create_user(
            &db,
            NewUser {
                username: "cashier1".to_string(),
                first_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                is_staff: true,
                ..NewUser::default()
            },
        )
        .await?;

        assert_eq!(user.to_string(), "cashier1");
        assert!(user.is_active);
        assert!(user.is_staff);
        assert!(!user.is_superuser);
        assert_eq!(user.last_login, None);

        let found = get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(found.username, "cashier1");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_user(&db, NewUser::with_username("manager")).await?;

        let result = create_user(&db, NewUser::with_username("manager")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateUsername { username: _ }
        ));

        let result = create_user(&db, NewUser::with_username("  ")).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_and_login() -> Result<()> {
        let db = setup_test_db().await?;
        create_user(&db, NewUser::with_username("alice")).await?;
        create_user(&db, NewUser::with_username("bob")).await?;

        let bob = record_login(&db, "bob").await?;
        assert!(bob.last_login.is_some());

        deactivate_user(&db, "alice").await?;
        let active = list_active_users(&db).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username, "bob");

        let result = deactivate_user(&db, "carol").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserNotFound { username: _ }
        ));

        Ok(())
    }
}
