// ==========================================
// NozzleApi - nozzle CRUD
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::printer::{Nozzle, NozzleWithPrinter};
use crate::repository::nozzle_repo::NozzleRepository;
use crate::repository::printer_repo::PrinterRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNozzlePayload {
    pub size: f64,
    pub material: String,
    pub condition: String,
    pub notes: Option<String>,
    pub printer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNozzlePayload {
    pub size: Option<f64>,
    pub material: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub printer_id: Option<String>,
}

pub struct NozzleApi {
    nozzle_repo: Arc<NozzleRepository>,
    printer_repo: Arc<PrinterRepository>,
}

impl NozzleApi {
    pub fn new(nozzle_repo: Arc<NozzleRepository>, printer_repo: Arc<PrinterRepository>) -> Self {
        Self {
            nozzle_repo,
            printer_repo,
        }
    }

    pub fn list(&self) -> ApiResult<Vec<NozzleWithPrinter>> {
        Ok(self.nozzle_repo.list_with_printer()?)
    }

    pub fn get(&self, id: &str) -> ApiResult<NozzleWithPrinter> {
        self.nozzle_repo
            .find_with_printer(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Nozzle {id} not found")))
    }

    pub fn create(&self, payload: CreateNozzlePayload) -> ApiResult<Nozzle> {
        if !payload.size.is_finite() || payload.size <= 0.0 {
            return Err(ApiError::InvalidInput(
                "size must be a positive number".to_string(),
            ));
        }
        if let Some(printer_id) = payload.printer_id.as_deref() {
            if self.printer_repo.find_by_id(printer_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Printer {printer_id} not found")));
            }
        }

        let now = Utc::now();
        let nozzle = Nozzle {
            id: Uuid::new_v4().to_string(),
            size: payload.size,
            material: payload.material,
            condition: payload.condition,
            notes: payload.notes,
            printer_id: payload.printer_id,
            created_at: now,
            updated_at: now,
        };
        self.nozzle_repo.insert(&nozzle)?;
        Ok(nozzle)
    }

    pub fn update(&self, id: &str, payload: UpdateNozzlePayload) -> ApiResult<Nozzle> {
        let mut nozzle = self
            .nozzle_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Nozzle {id} not found")))?;

        if let Some(size) = payload.size {
            if !size.is_finite() || size <= 0.0 {
                return Err(ApiError::InvalidInput(
                    "size must be a positive number".to_string(),
                ));
            }
            nozzle.size = size;
        }
        if let Some(material) = payload.material {
            nozzle.material = material;
        }
        if let Some(condition) = payload.condition {
            nozzle.condition = condition;
        }
        if let Some(notes) = payload.notes {
            nozzle.notes = Some(notes);
        }
        if let Some(printer_id) = payload.printer_id {
            if self.printer_repo.find_by_id(&printer_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Printer {printer_id} not found")));
            }
            nozzle.printer_id = Some(printer_id);
        }

        nozzle.updated_at = Utc::now();
        if !self.nozzle_repo.update(&nozzle)? {
            return Err(ApiError::NotFound(format!("Nozzle {id} not found")));
        }
        Ok(nozzle)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.nozzle_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Nozzle {id} not found")));
        }
        Ok(())
    }
}
