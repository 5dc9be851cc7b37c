// ==========================================
// SpoolRepository - filament spool storage
// ==========================================
// Owns the filament_spool and filament_usage tables. The usage decrement is a
// single conditional UPDATE inside the usage transaction, so two concurrent
// usage events can never overdraw a spool.
// ==========================================

use crate::domain::model::PrintModel;
use crate::domain::printer::Printer;
use crate::domain::spool::{FilamentSpool, FilamentUsage, FilamentUsageDetail};
use crate::domain::types::{SpoolFilter, LOW_STOCK_THRESHOLD_G};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SPOOL_COLUMNS: &str = "id, brand, material, color_name, color_hex, diameter, \
     total_weight, remaining_weight, price, purchase_date, store, url, \
     opened, opened_date, location, notes, created_at, updated_at";

/// Outcome of applying a usage event against a spool.
#[derive(Debug)]
pub enum UsageApplyResult {
    /// Both writes committed; the created usage record.
    Applied(FilamentUsage),
    /// No spool with the given id.
    SpoolMissing,
    /// Spool exists but holds less material than requested.
    Insufficient { remaining: f64 },
}

pub struct SpoolRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_spool_row(row: &Row) -> SqliteResult<FilamentSpool> {
    Ok(FilamentSpool {
        id: row.get(0)?,
        brand: row.get(1)?,
        material: row.get(2)?,
        color_name: row.get(3)?,
        color_hex: row.get(4)?,
        diameter: row.get(5)?,
        total_weight: row.get(6)?,
        remaining_weight: row.get(7)?,
        price: row.get(8)?,
        purchase_date: row.get(9)?,
        store: row.get(10)?,
        url: row.get(11)?,
        opened: row.get(12)?,
        opened_date: row.get(13)?,
        location: row.get(14)?,
        notes: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}

impl SpoolRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // CRUD
    // ==========================================

    pub fn insert(&self, spool: &FilamentSpool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO filament_spool (
                id, brand, material, color_name, color_hex, diameter,
                total_weight, remaining_weight, price, purchase_date, store, url,
                opened, opened_date, location, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18
            )
            "#,
            params![
                spool.id,
                spool.brand,
                spool.material,
                spool.color_name,
                spool.color_hex,
                spool.diameter,
                spool.total_weight,
                spool.remaining_weight,
                spool.price,
                spool.purchase_date,
                spool.store,
                spool.url,
                spool.opened,
                spool.opened_date,
                spool.location,
                spool.notes,
                spool.created_at,
                spool.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FilamentSpool>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SPOOL_COLUMNS} FROM filament_spool WHERE id = ?1");
        let result = conn
            .query_row(&sql, params![id], map_spool_row)
            .optional()?;
        Ok(result)
    }

    /// Full-row update; the API layer merges partial payloads before calling.
    pub fn update(&self, spool: &FilamentSpool) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE filament_spool SET
                brand = ?2, material = ?3, color_name = ?4, color_hex = ?5,
                diameter = ?6, total_weight = ?7, remaining_weight = ?8,
                price = ?9, purchase_date = ?10, store = ?11, url = ?12,
                opened = ?13, opened_date = ?14, location = ?15, notes = ?16,
                updated_at = ?17
            WHERE id = ?1
            "#,
            params![
                spool.id,
                spool.brand,
                spool.material,
                spool.color_name,
                spool.color_hex,
                spool.diameter,
                spool.total_weight,
                spool.remaining_weight,
                spool.price,
                spool.purchase_date,
                spool.store,
                spool.url,
                spool.opened,
                spool.opened_date,
                spool.location,
                spool.notes,
                spool.updated_at,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a spool. Usage rows go with it (ON DELETE CASCADE).
    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM filament_spool WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    // ==========================================
    // Filtered listing
    // ==========================================

    /// List spools matching the filter, newest first, plus the total match
    /// count for the pagination envelope.
    ///
    /// Ordering is `created_at DESC, id DESC`; the id tiebreak keeps
    /// pagination stable when timestamps collide.
    pub fn list(&self, filter: &SpoolFilter) -> RepositoryResult<(Vec<FilamentSpool>, u64)> {
        let conn = self.get_conn()?;

        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(material) = &filter.material {
            clauses.push(format!("material = ?{}", values.len() + 1));
            values.push(Box::new(material.clone()));
        }
        if let Some(opened) = filter.opened {
            clauses.push(format!("opened = ?{}", values.len() + 1));
            values.push(Box::new(opened));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            let idx = values.len() + 1;
            clauses.push(format!(
                "(LOWER(brand) LIKE ?{idx} OR LOWER(material) LIKE ?{idx} OR LOWER(color_name) LIKE ?{idx})"
            ));
            values.push(Box::new(pattern));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let params_ref: Vec<&dyn rusqlite::ToSql> =
            values.iter().map(|v| v.as_ref()).collect();

        let count_sql = format!("SELECT COUNT(*) FROM filament_spool {where_sql}");
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |row| row.get(0))?;

        let page_sql = format!(
            "SELECT {SPOOL_COLUMNS} FROM filament_spool {where_sql} \
             ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
            filter.limit(),
            filter.offset()
        );
        let mut stmt = conn.prepare(&page_sql)?;
        let spools = stmt
            .query_map(params_ref.as_slice(), map_spool_row)?
            .collect::<SqliteResult<Vec<FilamentSpool>>>()?;

        Ok((spools, total))
    }

    /// All spools, optionally restricted to unopened ones. Used by the
    /// dashboard aggregation, which groups in application code.
    pub fn list_all(&self, unopened_only: bool) -> RepositoryResult<Vec<FilamentSpool>> {
        let conn = self.get_conn()?;
        let sql = if unopened_only {
            format!(
                "SELECT {SPOOL_COLUMNS} FROM filament_spool WHERE opened = 0 \
                 ORDER BY created_at DESC, id DESC"
            )
        } else {
            format!(
                "SELECT {SPOOL_COLUMNS} FROM filament_spool \
                 ORDER BY created_at DESC, id DESC"
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let spools = stmt
            .query_map([], map_spool_row)?
            .collect::<SqliteResult<Vec<FilamentSpool>>>()?;
        Ok(spools)
    }

    // ==========================================
    // Dashboard counters
    // ==========================================

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM filament_spool", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn count_low_stock(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row(
            "SELECT COUNT(*) FROM filament_spool WHERE remaining_weight < ?1",
            params![LOW_STOCK_THRESHOLD_G],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn count_unopened(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row(
            "SELECT COUNT(*) FROM filament_spool WHERE opened = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    // ==========================================
    // Usage accounting
    // ==========================================

    /// Apply a usage event: decrement the spool and insert the log row as one
    /// transaction.
    ///
    /// The decrement is conditional (`remaining_weight >= grams_used` in the
    /// WHERE clause), so the check and the write are a single statement and
    /// concurrent submissions for the same spool cannot overdraw it.
    pub fn apply_usage(&self, usage: FilamentUsage) -> RepositoryResult<UsageApplyResult> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let affected = tx.execute(
            "UPDATE filament_spool \
             SET remaining_weight = remaining_weight - ?1, updated_at = ?2 \
             WHERE id = ?3 AND remaining_weight >= ?1",
            params![usage.grams_used, Utc::now(), usage.filament_spool_id],
        )?;

        if affected == 0 {
            // Distinguish a missing spool from an insufficient one. The
            // transaction rolls back on drop; nothing was written.
            let remaining: Option<f64> = tx
                .query_row(
                    "SELECT remaining_weight FROM filament_spool WHERE id = ?1",
                    params![usage.filament_spool_id],
                    |row| row.get(0),
                )
                .optional()?;
            return Ok(match remaining {
                None => UsageApplyResult::SpoolMissing,
                Some(remaining) => UsageApplyResult::Insufficient { remaining },
            });
        }

        tx.execute(
            r#"
            INSERT INTO filament_usage (
                id, filament_spool_id, grams_used, usage_date,
                printer_id, model_id, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                usage.id,
                usage.filament_spool_id,
                usage.grams_used,
                usage.usage_date,
                usage.printer_id,
                usage.model_id,
                usage.notes,
                usage.created_at,
            ],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(UsageApplyResult::Applied(usage))
    }

    /// Usage history for a spool, each entry expanded with its printer and
    /// model, newest usage first.
    pub fn list_usages(&self, spool_id: &str) -> RepositoryResult<Vec<FilamentUsageDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                u.id, u.filament_spool_id, u.grams_used, u.usage_date,
                u.printer_id, u.model_id, u.notes, u.created_at,
                p.id, p.name, p.model, p.notes, p.current_nozzle_id, p.created_at, p.updated_at,
                m.id, m.name, m.link, m.notes, m.created_at, m.updated_at
            FROM filament_usage u
            LEFT JOIN printer p ON p.id = u.printer_id
            LEFT JOIN print_model m ON m.id = u.model_id
            WHERE u.filament_spool_id = ?1
            ORDER BY u.usage_date DESC, u.id DESC
            "#,
        )?;

        let usages = stmt
            .query_map(params![spool_id], |row| {
                let usage = FilamentUsage {
                    id: row.get(0)?,
                    filament_spool_id: row.get(1)?,
                    grams_used: row.get(2)?,
                    usage_date: row.get(3)?,
                    printer_id: row.get(4)?,
                    model_id: row.get(5)?,
                    notes: row.get(6)?,
                    created_at: row.get(7)?,
                };
                let printer = match row.get::<_, Option<String>>(8)? {
                    Some(id) => Some(Printer {
                        id,
                        name: row.get(9)?,
                        model: row.get(10)?,
                        notes: row.get(11)?,
                        current_nozzle_id: row.get(12)?,
                        created_at: row.get(13)?,
                        updated_at: row.get(14)?,
                    }),
                    None => None,
                };
                let model = match row.get::<_, Option<String>>(15)? {
                    Some(id) => Some(PrintModel {
                        id,
                        name: row.get(16)?,
                        link: row.get(17)?,
                        notes: row.get(18)?,
                        created_at: row.get(19)?,
                        updated_at: row.get(20)?,
                    }),
                    None => None,
                };
                Ok(FilamentUsageDetail {
                    usage,
                    printer,
                    model,
                })
            })?
            .collect::<SqliteResult<Vec<FilamentUsageDetail>>>()?;

        Ok(usages)
    }
}
