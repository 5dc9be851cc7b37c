// ==========================================
// PrinterRepository - printer storage
// ==========================================

use crate::domain::printer::{Nozzle, Printer, PrinterDetail, PrinterWithNozzle};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PRINTER_COLUMNS: &str = "id, name, model, notes, current_nozzle_id, created_at, updated_at";

pub(crate) fn map_printer_row(row: &Row) -> SqliteResult<Printer> {
    Ok(Printer {
        id: row.get(0)?,
        name: row.get(1)?,
        model: row.get(2)?,
        notes: row.get(3)?,
        current_nozzle_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn map_nozzle_row_at(row: &Row, base: usize) -> SqliteResult<Option<Nozzle>> {
    match row.get::<_, Option<String>>(base)? {
        Some(id) => Ok(Some(Nozzle {
            id,
            size: row.get(base + 1)?,
            material: row.get(base + 2)?,
            condition: row.get(base + 3)?,
            notes: row.get(base + 4)?,
            printer_id: row.get(base + 5)?,
            created_at: row.get(base + 6)?,
            updated_at: row.get(base + 7)?,
        })),
        None => Ok(None),
    }
}

pub struct PrinterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PrinterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, printer: &Printer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO printer (id, name, model, notes, current_nozzle_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                printer.id,
                printer.name,
                printer.model,
                printer.notes,
                printer.current_nozzle_id,
                printer.created_at,
                printer.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Printer>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {PRINTER_COLUMNS} FROM printer WHERE id = ?1");
        Ok(conn.query_row(&sql, params![id], map_printer_row).optional()?)
    }

    /// All printers, each with its mounted nozzle.
    pub fn list_with_nozzle(&self) -> RepositoryResult<Vec<PrinterWithNozzle>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                p.id, p.name, p.model, p.notes, p.current_nozzle_id, p.created_at, p.updated_at,
                n.id, n.size, n.material, n.condition, n.notes, n.printer_id, n.created_at, n.updated_at
            FROM printer p
            LEFT JOIN nozzle n ON n.id = p.current_nozzle_id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )?;
        let printers = stmt
            .query_map([], |row| {
                Ok(PrinterWithNozzle {
                    printer: map_printer_row(row)?,
                    current_nozzle: map_nozzle_row_at(row, 7)?,
                })
            })?
            .collect::<SqliteResult<Vec<PrinterWithNozzle>>>()?;
        Ok(printers)
    }

    /// One printer with its mounted nozzle and all owned nozzles.
    pub fn find_detail(&self, id: &str) -> RepositoryResult<Option<PrinterDetail>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT
                p.id, p.name, p.model, p.notes, p.current_nozzle_id, p.created_at, p.updated_at,
                n.id, n.size, n.material, n.condition, n.notes, n.printer_id, n.created_at, n.updated_at
            FROM printer p
            LEFT JOIN nozzle n ON n.id = p.current_nozzle_id
            WHERE p.id = ?1
            "#
        );
        let head = conn
            .query_row(&sql, params![id], |row| {
                Ok((map_printer_row(row)?, map_nozzle_row_at(row, 7)?))
            })
            .optional()?;

        let (printer, current_nozzle) = match head {
            Some(pair) => pair,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            "SELECT id, size, material, condition, notes, printer_id, created_at, updated_at \
             FROM nozzle WHERE printer_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let nozzles = stmt
            .query_map(params![id], |row| {
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
            })?
            .collect::<SqliteResult<Vec<Nozzle>>>()?;

        Ok(Some(PrinterDetail {
            printer,
            current_nozzle,
            nozzles,
        }))
    }

    pub fn update(&self, printer: &Printer) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE printer SET
                name = ?2, model = ?3, notes = ?4, current_nozzle_id = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                printer.id,
                printer.name,
                printer.model,
                printer.notes,
                printer.current_nozzle_id,
                printer.updated_at,
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM printer WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM printer", [], |row| row.get(0))?;
        Ok(n)
    }
}
