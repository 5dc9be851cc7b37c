// ==========================================
// NozzleRepository - nozzle storage
// ==========================================

use crate::domain::printer::{Nozzle, NozzleWithPrinter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const NOZZLE_COLUMNS: &str = "id, size, material, condition, notes, printer_id, created_at, updated_at";

fn map_nozzle_row(row: &Row) -> SqliteResult<Nozzle> {
    Ok(Nozzle {
        id: row.get(0)?,
        size: row.get(1)?,
        material: row.get(2)?,
        condition: row.get(3)?,
        notes: row.get(4)?,
        printer_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub struct NozzleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NozzleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, nozzle: &Nozzle) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO nozzle (id, size, material, condition, notes, printer_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                nozzle.id,
                nozzle.size,
                nozzle.material,
                nozzle.condition,
                nozzle.notes,
                nozzle.printer_id,
                nozzle.created_at,
                nozzle.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Nozzle>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {NOZZLE_COLUMNS} FROM nozzle WHERE id = ?1");
        Ok(conn.query_row(&sql, params![id], map_nozzle_row).optional()?)
    }

    /// All nozzles, each with its owning printer.
    pub fn list_with_printer(&self) -> RepositoryResult<Vec<NozzleWithPrinter>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                n.id, n.size, n.material, n.condition, n.notes, n.printer_id, n.created_at, n.updated_at,
                p.id, p.name, p.model, p.notes, p.current_nozzle_id, p.created_at, p.updated_at
            FROM nozzle n
            LEFT JOIN printer p ON p.id = n.printer_id
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )?;
        let nozzles = stmt
            .query_map([], |row| {
                let nozzle = map_nozzle_row(row)?;
                let printer = match row.get::<_, Option<String>>(8)? {
                    Some(printer_id) => Some(crate::domain::printer::Printer {
                        id: printer_id,
                        name: row.get(9)?,
                        model: row.get(10)?,
                        notes: row.get(11)?,
                        current_nozzle_id: row.get(12)?,
                        created_at: row.get(13)?,
                        updated_at: row.get(14)?,
                    }),
                    None => None,
                };
                Ok(NozzleWithPrinter { nozzle, printer })
            })?
            .collect::<SqliteResult<Vec<NozzleWithPrinter>>>()?;
        Ok(nozzles)
    }

    pub fn find_with_printer(&self, id: &str) -> RepositoryResult<Option<NozzleWithPrinter>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT
                    n.id, n.size, n.material, n.condition, n.notes, n.printer_id, n.created_at, n.updated_at,
                    p.id, p.name, p.model, p.notes, p.current_nozzle_id, p.created_at, p.updated_at
                FROM nozzle n
                LEFT JOIN printer p ON p.id = n.printer_id
                WHERE n.id = ?1
                "#,
                params![id],
                |row| {
                    let nozzle = map_nozzle_row(row)?;
                    let printer = match row.get::<_, Option<String>>(8)? {
                        Some(printer_id) => Some(crate::domain::printer::Printer {
                            id: printer_id,
                            name: row.get(9)?,
                            model: row.get(10)?,
                            notes: row.get(11)?,
                            current_nozzle_id: row.get(12)?,
                            created_at: row.get(13)?,
                            updated_at: row.get(14)?,
                        }),
                        None => None,
                    };
                    Ok(NozzleWithPrinter { nozzle, printer })
                },
            )
            .optional()?;
        Ok(result)
    }

    pub fn update(&self, nozzle: &Nozzle) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE nozzle SET
                size = ?2, material = ?3, condition = ?4, notes = ?5,
                printer_id = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                nozzle.id,
                nozzle.size,
                nozzle.material,
                nozzle.condition,
                nozzle.notes,
                nozzle.printer_id,
                nozzle.updated_at,
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM nozzle WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM nozzle", [], |row| row.get(0))?;
        Ok(n)
    }
}
