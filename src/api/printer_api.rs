// ==========================================
// PrinterApi - printer CRUD
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::printer::{Printer, PrinterDetail, PrinterWithNozzle};
use crate::repository::nozzle_repo::NozzleRepository;
use crate::repository::printer_repo::PrinterRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrinterPayload {
    pub name: String,
    pub model: String,
    pub notes: Option<String>,
    pub current_nozzle_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrinterPayload {
    pub name: Option<String>,
    pub model: Option<String>,
    pub notes: Option<String>,
    pub current_nozzle_id: Option<String>,
}

pub struct PrinterApi {
    printer_repo: Arc<PrinterRepository>,
    nozzle_repo: Arc<NozzleRepository>,
}

impl PrinterApi {
    pub fn new(printer_repo: Arc<PrinterRepository>, nozzle_repo: Arc<NozzleRepository>) -> Self {
        Self {
            printer_repo,
            nozzle_repo,
        }
    }

    pub fn list(&self) -> ApiResult<Vec<PrinterWithNozzle>> {
        Ok(self.printer_repo.list_with_nozzle()?)
    }

    pub fn get(&self, id: &str) -> ApiResult<PrinterDetail> {
        self.printer_repo
            .find_detail(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Printer {id} not found")))
    }

    pub fn create(&self, payload: CreatePrinterPayload) -> ApiResult<Printer> {
        if payload.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("name must not be empty".to_string()));
        }
        if let Some(nozzle_id) = payload.current_nozzle_id.as_deref() {
            if self.nozzle_repo.find_by_id(nozzle_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Nozzle {nozzle_id} not found")));
            }
        }

        let now = Utc::now();
        let printer = Printer {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            model: payload.model,
            notes: payload.notes,
            current_nozzle_id: payload.current_nozzle_id,
            created_at: now,
            updated_at: now,
        };
        self.printer_repo.insert(&printer)?;
        Ok(printer)
    }

    pub fn update(&self, id: &str, payload: UpdatePrinterPayload) -> ApiResult<Printer> {
        let mut printer = self
            .printer_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Printer {id} not found")))?;

        if let Some(name) = payload.name {
            if name.trim().is_empty() {
                return Err(ApiError::InvalidInput("name must not be empty".to_string()));
            }
            printer.name = name;
        }
        if let Some(model) = payload.model {
            printer.model = model;
        }
        if let Some(notes) = payload.notes {
            printer.notes = Some(notes);
        }
        if let Some(nozzle_id) = payload.current_nozzle_id {
            if self.nozzle_repo.find_by_id(&nozzle_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Nozzle {nozzle_id} not found")));
            }
            printer.current_nozzle_id = Some(nozzle_id);
        }

        printer.updated_at = Utc::now();
        if !self.printer_repo.update(&printer)? {
            return Err(ApiError::NotFound(format!("Printer {id} not found")));
        }
        Ok(printer)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.printer_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Printer {id} not found")));
        }
        Ok(())
    }
}
