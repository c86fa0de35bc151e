use crate::entities::{habits, prelude::*, progress};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

/// Field-level changes for a habit update. `None` leaves the field as is.
#[derive(Debug, Default)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_per_day: Option<i32>,
}

pub struct HabitRepository {
    conn: DatabaseConnection,
}

impl HabitRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        owner_id: i32,
        name: String,
        category: Option<String>,
        target_per_day: i32,
    ) -> Result<habits::Model> {
        let inserted = Habits::insert(habits::ActiveModel {
            name: Set(name),
            category: Set(category),
            target_per_day: Set(target_per_day),
            user_id: Set(owner_id),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let habit = Habits::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created habit"))?;

        info!("Created habit '{}' for user {}", habit.name, owner_id);
        Ok(habit)
    }

    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<habits::Model>> {
        let rows = Habits::find()
            .filter(habits::Column::UserId.eq(owner_id))
            .order_by_asc(habits::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Fetch a habit scoped to its owner. Habits owned by someone else
    /// look exactly like habits that do not exist.
    pub async fn get_for_owner(&self, owner_id: i32, habit_id: i32) -> Result<Option<habits::Model>> {
        let habit = Habits::find()
            .filter(habits::Column::Id.eq(habit_id))
            .filter(habits::Column::UserId.eq(owner_id))
            .one(&self.conn)
            .await?;

        Ok(habit)
    }

    /// Apply partial changes to an owned habit. Returns `None` when the
    /// habit is absent or owned by another user.
    pub async fn update_for_owner(
        &self,
        owner_id: i32,
        habit_id: i32,
        changes: HabitChanges,
    ) -> Result<Option<habits::Model>> {
        let Some(habit) = self.get_for_owner(owner_id, habit_id).await? else {
            return Ok(None);
        };

        let mut active: habits::ActiveModel = habit.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(category) = changes.category {
            active.category = Set(Some(category));
        }
        if let Some(target_per_day) = changes.target_per_day {
            active.target_per_day = Set(target_per_day);
        }

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    /// Delete an owned habit together with its progress entries.
    /// Both deletes run in one transaction so a half-removed habit is
    /// never observable. Returns false when the habit is absent or
    /// owned by another user.
    pub async fn delete_for_owner(&self, owner_id: i32, habit_id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let habit = Habits::find()
            .filter(habits::Column::Id.eq(habit_id))
            .filter(habits::Column::UserId.eq(owner_id))
            .one(&txn)
            .await?;

        if habit.is_none() {
            return Ok(false);
        }

        Progress::delete_many()
            .filter(progress::Column::HabitId.eq(habit_id))
            .exec(&txn)
            .await?;

        Habits::delete_by_id(habit_id).exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted habit {} for user {}", habit_id, owner_id);
        Ok(true)
    }
}
