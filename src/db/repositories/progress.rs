use crate::entities::{prelude::*, progress};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct ProgressRepository {
    conn: DatabaseConnection,
}

impl ProgressRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record a progress entry. When no date is given the entry lands
    /// on today's date (UTC). Returns `None` when no habit with that id
    /// exists; the habit's owner is deliberately not checked.
    pub async fn create(
        &self,
        habit_id: i32,
        date_tracked: Option<NaiveDate>,
        amount_done: i32,
    ) -> Result<Option<progress::Model>> {
        if Habits::find_by_id(habit_id).one(&self.conn).await?.is_none() {
            return Ok(None);
        }

        let date_tracked = date_tracked.unwrap_or_else(|| Utc::now().date_naive());

        let inserted = Progress::insert(progress::ActiveModel {
            habit_id: Set(habit_id),
            amount_done: Set(amount_done),
            date_tracked: Set(date_tracked),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let entry = Progress::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created progress entry"))?;

        Ok(Some(entry))
    }

    pub async fn list_all(&self) -> Result<Vec<progress::Model>> {
        let rows = Progress::find()
            .order_by_asc(progress::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_for_habit(&self, habit_id: i32) -> Result<Vec<progress::Model>> {
        let rows = Progress::find()
            .filter(progress::Column::HabitId.eq(habit_id))
            .order_by_asc(progress::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }
}
