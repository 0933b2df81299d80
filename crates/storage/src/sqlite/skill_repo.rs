use chrono::{NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tokio::sync::watch;

use tracker_core::model::{Entry, Skill, SkillId};

use super::SqliteSkillStore;
use super::mapping::{color_from_text, entry_id_from_i64, entry_id_to_i64, ser};
use crate::repository::{EntryRecord, NewSkillRecord, SkillStore, SkillsSnapshot, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl SkillStore for SqliteSkillStore {
    async fn insert_new_skill(&self, skill: NewSkillRecord) -> Result<SkillId, StorageError> {
        let id = SkillId::generate();
        sqlx::query(
            r"
            INSERT INTO skills (id, name, category, target_hours, color, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(id.as_str())
        .bind(skill.name)
        .bind(skill.category)
        .bind(skill.target_hours)
        .bind(skill.color.as_str())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(conn)?;

        self.refresh_snapshot().await?;
        Ok(id)
    }

    async fn append_entry(
        &self,
        skill_id: &SkillId,
        entry: EntryRecord,
    ) -> Result<(), StorageError> {
        let entry_id = entry_id_to_i64(entry.id)?;

        let mut tx = self.pool().begin().await.map_err(conn)?;

        let skill_exists = sqlx::query("SELECT 1 FROM skills WHERE id = ?1")
            .bind(skill_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?
            .is_some();
        if !skill_exists {
            return Err(StorageError::NotFound);
        }

        let duplicate = sqlx::query("SELECT 1 FROM entries WHERE skill_id = ?1 AND id = ?2")
            .bind(skill_id.as_str())
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?
            .is_some();
        if duplicate {
            return Err(StorageError::Conflict);
        }

        sqlx::query(
            r"
            INSERT INTO entries (id, skill_id, date, hours, notes, position)
            SELECT ?1, ?2, ?3, ?4, ?5, COALESCE(MAX(position) + 1, 0)
            FROM entries WHERE skill_id = ?2
            ",
        )
        .bind(entry_id)
        .bind(skill_id.as_str())
        .bind(entry.date)
        .bind(entry.hours)
        .bind(entry.notes)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;

        self.refresh_snapshot().await?;
        Ok(())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StorageError> {
        // rowid preserves insertion order, standing in for the external
        // store's stable document order.
        let skill_rows = sqlx::query(
            r"
            SELECT id, name, category, target_hours, color
            FROM skills
            ORDER BY rowid ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut skills = Vec::with_capacity(skill_rows.len());
        for row in skill_rows {
            skills.push(self.skill_from_row(&row).await?);
        }
        Ok(skills)
    }

    fn subscribe(&self) -> watch::Receiver<SkillsSnapshot> {
        self.snapshot_tx.subscribe()
    }
}

impl SqliteSkillStore {
    async fn skill_from_row(&self, row: &SqliteRow) -> Result<Skill, StorageError> {
        let id: String = row.try_get("id").map_err(ser)?;

        let entry_rows = sqlx::query(
            r"
            SELECT id, date, hours, notes
            FROM entries
            WHERE skill_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(&id)
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut entries = Vec::with_capacity(entry_rows.len());
        for entry_row in entry_rows {
            entries.push(entry_from_row(&entry_row)?);
        }

        Ok(Skill::from_parts(
            SkillId::new(id),
            row.try_get::<String, _>("name").map_err(ser)?,
            row.try_get::<String, _>("category").map_err(ser)?,
            row.try_get::<f64, _>("target_hours").map_err(ser)?,
            color_from_text(&row.try_get::<String, _>("color").map_err(ser)?)?,
            entries,
        ))
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<Entry, StorageError> {
    Ok(Entry::from_parts(
        entry_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<NaiveDate, _>("date").map_err(ser)?,
        row.try_get::<String, _>("hours").map_err(ser)?,
        row.try_get::<String, _>("notes").map_err(ser)?,
    ))
}
