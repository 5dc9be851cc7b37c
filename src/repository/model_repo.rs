// ==========================================
// ModelRepository - printable model and tag storage
// ==========================================
// Tags are name-unique and upserted; join rows in model_tag are replaced
// wholesale when a model's tag set changes.
// ==========================================

use crate::domain::model::{ModelWithTags, PrintModel, Tag};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const MODEL_COLUMNS: &str = "id, name, link, notes, created_at, updated_at";

fn map_model_row(row: &Row) -> SqliteResult<PrintModel> {
    Ok(PrintModel {
        id: row.get(0)?,
        name: row.get(1)?,
        link: row.get(2)?,
        notes: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub struct ModelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ModelRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Upsert tags by name and attach them to the model, replacing any
    /// existing join rows. Runs inside the caller's transaction.
    fn set_tags(tx: &Transaction, model_id: &str, tag_names: &[String]) -> RepositoryResult<()> {
        tx.execute(
            "DELETE FROM model_tag WHERE model_id = ?1",
            params![model_id],
        )?;
        for name in tag_names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            tx.execute(
                "INSERT OR IGNORE INTO tag (id, name) VALUES (?1, ?2)",
                params![Uuid::new_v4().to_string(), name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO model_tag (model_id, tag_id) \
                 SELECT ?1, id FROM tag WHERE name = ?2",
                params![model_id, name],
            )?;
        }
        Ok(())
    }

    pub fn insert(&self, model: &PrintModel, tag_names: &[String]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        tx.execute(
            r#"
            INSERT INTO print_model (id, name, link, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                model.id,
                model.name,
                model.link,
                model.notes,
                model.created_at,
                model.updated_at,
            ],
        )?;
        Self::set_tags(&tx, &model.id, tag_names)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<PrintModel>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {MODEL_COLUMNS} FROM print_model WHERE id = ?1");
        Ok(conn.query_row(&sql, params![id], map_model_row).optional()?)
    }

    fn tags_for(conn: &Connection, model_id: &str) -> RepositoryResult<Vec<Tag>> {
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name FROM tag t \
             JOIN model_tag mt ON mt.tag_id = t.id \
             WHERE mt.model_id = ?1 ORDER BY t.name",
        )?;
        let tags = stmt
            .query_map(params![model_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Tag>>>()?;
        Ok(tags)
    }

    pub fn find_with_tags(&self, id: &str) -> RepositoryResult<Option<ModelWithTags>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {MODEL_COLUMNS} FROM print_model WHERE id = ?1");
        let model = conn.query_row(&sql, params![id], map_model_row).optional()?;
        match model {
            Some(model) => {
                let tags = Self::tags_for(&conn, &model.id)?;
                Ok(Some(ModelWithTags { model, tags }))
            }
            None => Ok(None),
        }
    }

    pub fn list_with_tags(&self) -> RepositoryResult<Vec<ModelWithTags>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {MODEL_COLUMNS} FROM print_model ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let models = stmt
            .query_map([], map_model_row)?
            .collect::<SqliteResult<Vec<PrintModel>>>()?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let tags = Self::tags_for(&conn, &model.id)?;
            result.push(ModelWithTags { model, tags });
        }
        Ok(result)
    }

    /// Full-row update. `tag_names = None` leaves the tag set untouched.
    pub fn update(
        &self,
        model: &PrintModel,
        tag_names: Option<&[String]>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let affected = tx.execute(
            r#"
            UPDATE print_model SET name = ?2, link = ?3, notes = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
            params![model.id, model.name, model.link, model.notes, model.updated_at],
        )?;
        if affected == 0 {
            return Ok(false);
        }
        if let Some(tag_names) = tag_names {
            Self::set_tags(&tx, &model.id, tag_names)?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(true)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM print_model WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM print_model", [], |row| row.get(0))?;
        Ok(n)
    }
}
