use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::AuthConfig;
use crate::entities::{habits, progress};

pub mod migrator;
pub mod repositories;

pub use repositories::habit::HabitChanges;
pub use repositories::user::{RegisterError, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                tokio::fs::File::create(path_str).await?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Drop every table and rebuild the schema from scratch.
    pub async fn reset(&self) -> Result<()> {
        use sea_orm_migration::MigratorTrait;

        migrator::Migrator::fresh(&self.conn).await?;
        info!("Database schema reset");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn habit_repo(&self) -> repositories::habit::HabitRepository {
        repositories::habit::HabitRepository::new(self.conn.clone())
    }

    fn progress_repo(&self) -> repositories::progress::ProgressRepository {
        repositories::progress::ProgressRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        config: &AuthConfig,
    ) -> Result<User, RegisterError> {
        self.user_repo()
            .register(username, email, password, config)
            .await
    }

    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_credentials(username, password)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<bool> {
        self.user_repo().delete(user_id).await
    }

    // ========== Habit Repository Methods ==========

    pub async fn create_habit(
        &self,
        owner_id: i32,
        name: String,
        category: Option<String>,
        target_per_day: i32,
    ) -> Result<habits::Model> {
        self.habit_repo()
            .create(owner_id, name, category, target_per_day)
            .await
    }

    pub async fn list_habits(&self, owner_id: i32) -> Result<Vec<habits::Model>> {
        self.habit_repo().list_for_owner(owner_id).await
    }

    pub async fn get_habit(&self, owner_id: i32, habit_id: i32) -> Result<Option<habits::Model>> {
        self.habit_repo().get_for_owner(owner_id, habit_id).await
    }

    pub async fn update_habit(
        &self,
        owner_id: i32,
        habit_id: i32,
        changes: HabitChanges,
    ) -> Result<Option<habits::Model>> {
        self.habit_repo()
            .update_for_owner(owner_id, habit_id, changes)
            .await
    }

    pub async fn delete_habit(&self, owner_id: i32, habit_id: i32) -> Result<bool> {
        self.habit_repo().delete_for_owner(owner_id, habit_id).await
    }

    // ========== Progress Repository Methods ==========

    pub async fn create_progress(
        &self,
        habit_id: i32,
        date_tracked: Option<NaiveDate>,
        amount_done: i32,
    ) -> Result<Option<progress::Model>> {
        self.progress_repo()
            .create(habit_id, date_tracked, amount_done)
            .await
    }

    pub async fn list_all_progress(&self) -> Result<Vec<progress::Model>> {
        self.progress_repo().list_all().await
    }

    pub async fn list_progress_for_habit(&self, habit_id: i32) -> Result<Vec<progress::Model>> {
        self.progress_repo().list_for_habit(habit_id).await
    }
}
