use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use thiserror::Error;
use tokio::task;

use crate::config::AuthConfig;
use crate::entities::{habits, prelude::*, progress, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

/// Errors specific to account registration.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a new account. The email must not already be taken; the
    /// duplicate check and the insert run in the same transaction.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        config: &AuthConfig,
    ) -> Result<User, RegisterError> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open transaction for registration")?;

        let existing = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&txn)
            .await
            .context("Failed to query user by email")?;

        if existing.is_some() {
            return Err(RegisterError::DuplicateEmail);
        }

        // Argon2 costs real CPU, so hash only once the email is known
        // to be free, and in a blocking task.
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let inserted = Users::insert(users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .context("Failed to insert user")?;

        let user = Users::find_by_id(inserted.last_insert_id)
            .one(&txn)
            .await
            .context("Failed to query created user")?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        txn.commit()
            .await
            .context("Failed to commit registration")?;

        Ok(User::from(user))
    }

    /// Verify username/password and return the user on success.
    /// Unknown username and wrong password both come back as `None`.
    ///
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Get user by email (token subjects carry the email)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Delete a user and everything they own. Progress rows go first,
    /// then habit rows, then the user, all in one transaction.
    /// Returns false when the user does not exist.
    pub async fn delete(&self, user_id: i32) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open transaction for user delete")?;

        let user = Users::find_by_id(user_id)
            .one(&txn)
            .await
            .context("Failed to query user for delete")?;

        if user.is_none() {
            return Ok(false);
        }

        let habit_ids: Vec<i32> = Habits::find()
            .filter(habits::Column::UserId.eq(user_id))
            .all(&txn)
            .await
            .context("Failed to query habits for user delete")?
            .into_iter()
            .map(|h| h.id)
            .collect();

        if !habit_ids.is_empty() {
            Progress::delete_many()
                .filter(progress::Column::HabitId.is_in(habit_ids))
                .exec(&txn)
                .await
                .context("Failed to delete progress for user delete")?;

            Habits::delete_many()
                .filter(habits::Column::UserId.eq(user_id))
                .exec(&txn)
                .await
                .context("Failed to delete habits for user delete")?;
        }

        Users::delete_by_id(user_id)
            .exec(&txn)
            .await
            .context("Failed to delete user")?;

        txn.commit().await.context("Failed to commit user delete")?;
        Ok(true)
    }
}

/// Hash a password using Argon2id with params from config.
pub fn hash_password(password: &str, config: &AuthConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
