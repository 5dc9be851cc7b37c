// ==========================================
// FilamentApi - spool CRUD and stock accounting
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::spool::{FilamentSpool, FilamentSpoolDetail, FilamentUsage};
use crate::domain::types::{Paginated, Pagination, SpoolFilter};
use crate::repository::model_repo::ModelRepository;
use crate::repository::printer_repo::PrinterRepository;
use crate::repository::spool_repo::{SpoolRepository, UsageApplyResult};

// ==========================================
// Payloads
// ==========================================
// Unknown keys (including id/createdAt/updatedAt) are ignored by
// deserialization, which is exactly the PATCH contract.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilamentPayload {
    pub brand: String,
    pub material: String,
    pub color_name: String,
    pub color_hex: String,
    pub diameter: f64,
    pub total_weight: f64,
    pub remaining_weight: f64,
    pub price: f64,
    pub purchase_date: Option<String>,
    pub store: Option<String>,
    pub url: Option<String>,
    pub opened: Option<bool>,
    pub opened_date: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFilamentPayload {
    pub brand: Option<String>,
    pub material: Option<String>,
    pub color_name: Option<String>,
    pub color_hex: Option<String>,
    pub diameter: Option<f64>,
    pub total_weight: Option<f64>,
    pub remaining_weight: Option<f64>,
    pub price: Option<f64>,
    pub purchase_date: Option<String>,
    pub store: Option<String>,
    pub url: Option<String>,
    pub opened: Option<bool>,
    pub opened_date: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsagePayload {
    pub grams_used: f64,
    pub usage_date: Option<String>,
    pub printer_id: Option<String>,
    pub model_id: Option<String>,
    pub notes: Option<String>,
}

// ==========================================
// FilamentApi
// ==========================================

/// Spool application service.
///
/// Validation happens here, before any store access; the repository only
/// sees well-formed entities.
pub struct FilamentApi {
    spool_repo: Arc<SpoolRepository>,
    printer_repo: Arc<PrinterRepository>,
    model_repo: Arc<ModelRepository>,
}

impl FilamentApi {
    pub fn new(
        spool_repo: Arc<SpoolRepository>,
        printer_repo: Arc<PrinterRepository>,
        model_repo: Arc<ModelRepository>,
    ) -> Self {
        Self {
            spool_repo,
            printer_repo,
            model_repo,
        }
    }

    /// List spools matching the filter, paginated, newest first.
    pub fn list(&self, filter: &SpoolFilter) -> ApiResult<Paginated<FilamentSpool>> {
        let (data, total) = self.spool_repo.list(filter)?;
        Ok(Paginated {
            data,
            pagination: Pagination::new(total, filter.page(), filter.limit()),
        })
    }

    /// Fetch one spool with its usage history, each usage expanded with its
    /// printer and model.
    pub fn get(&self, id: &str) -> ApiResult<FilamentSpoolDetail> {
        let spool = self
            .spool_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Filament {id} not found")))?;
        let usages = self.spool_repo.list_usages(id)?;
        Ok(FilamentSpoolDetail { spool, usages })
    }

    pub fn create(&self, payload: CreateFilamentPayload) -> ApiResult<FilamentSpool> {
        validator::validate_create_filament(&payload)?;

        let purchase_date = payload
            .purchase_date
            .as_deref()
            .map(|v| validator::parse_date_field("purchaseDate", v))
            .transpose()
            .map_err(|v| ApiError::ValidationError {
                message: "1 field(s) invalid".to_string(),
                violations: vec![v],
            })?;
        let opened_date = payload
            .opened_date
            .as_deref()
            .map(|v| validator::parse_date_field("openedDate", v))
            .transpose()
            .map_err(|v| ApiError::ValidationError {
                message: "1 field(s) invalid".to_string(),
                violations: vec![v],
            })?;

        let now = Utc::now();
        let spool = FilamentSpool {
            id: Uuid::new_v4().to_string(),
            brand: payload.brand,
            material: payload.material,
            color_name: payload.color_name,
            color_hex: payload.color_hex,
            diameter: payload.diameter,
            total_weight: payload.total_weight,
            remaining_weight: payload.remaining_weight,
            price: payload.price,
            purchase_date,
            store: payload.store,
            url: payload.url,
            opened: payload.opened.unwrap_or(false),
            opened_date,
            location: payload.location,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };

        self.spool_repo.insert(&spool)?;
        tracing::info!(spool_id = %spool.id, brand = %spool.brand, "spool created");
        Ok(spool)
    }

    /// Partial update. Loads the current row, merges the provided fields,
    /// re-checks the weight invariant, writes back.
    pub fn update(&self, id: &str, payload: UpdateFilamentPayload) -> ApiResult<FilamentSpool> {
        let mut spool = self
            .spool_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Filament {id} not found")))?;

        if let Some(brand) = payload.brand {
            spool.brand = brand;
        }
        if let Some(material) = payload.material {
            spool.material = material;
        }
        if let Some(color_name) = payload.color_name {
            spool.color_name = color_name;
        }
        if let Some(color_hex) = payload.color_hex {
            spool.color_hex = color_hex;
        }
        if let Some(diameter) = payload.diameter {
            spool.diameter = diameter;
        }
        if let Some(total_weight) = payload.total_weight {
            spool.total_weight = total_weight;
        }
        if let Some(remaining_weight) = payload.remaining_weight {
            spool.remaining_weight = remaining_weight;
        }
        if let Some(price) = payload.price {
            spool.price = price;
        }
        if let Some(value) = payload.purchase_date.as_deref() {
            spool.purchase_date = Some(
                validator::parse_date_field("purchaseDate", value).map_err(|v| {
                    ApiError::ValidationError {
                        message: "1 field(s) invalid".to_string(),
                        violations: vec![v],
                    }
                })?,
            );
        }
        if let Some(store) = payload.store {
            spool.store = Some(store);
        }
        if let Some(url) = payload.url {
            spool.url = Some(url);
        }
        if let Some(opened) = payload.opened {
            spool.opened = opened;
        }
        if let Some(value) = payload.opened_date.as_deref() {
            spool.opened_date = Some(
                validator::parse_date_field("openedDate", value).map_err(|v| {
                    ApiError::ValidationError {
                        message: "1 field(s) invalid".to_string(),
                        violations: vec![v],
                    }
                })?,
            );
        }
        if let Some(location) = payload.location {
            spool.location = Some(location);
        }
        if let Some(notes) = payload.notes {
            spool.notes = Some(notes);
        }

        validator::validate_spool_weights(spool.remaining_weight, spool.total_weight)?;

        spool.updated_at = Utc::now();
        if !self.spool_repo.update(&spool)? {
            return Err(ApiError::NotFound(format!("Filament {id} not found")));
        }
        Ok(spool)
    }

    /// Delete a spool; its usage history cascades away with it.
    pub fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.spool_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Filament {id} not found")));
        }
        tracing::info!(spool_id = %id, "spool deleted");
        Ok(())
    }

    // ==========================================
    // Stock accounting
    // ==========================================

    /// Record a usage event against a spool.
    ///
    /// The spool decrement and the usage insert commit atomically; when the
    /// requested amount exceeds what remains, nothing is written and the
    /// error carries both figures.
    pub fn record_usage(
        &self,
        spool_id: &str,
        payload: CreateUsagePayload,
    ) -> ApiResult<FilamentUsage> {
        validator::validate_create_usage(&payload)?;

        // Referenced printer/model must exist before anything is written.
        if let Some(printer_id) = payload.printer_id.as_deref() {
            if self.printer_repo.find_by_id(printer_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Printer {printer_id} not found")));
            }
        }
        if let Some(model_id) = payload.model_id.as_deref() {
            if self.model_repo.find_by_id(model_id)?.is_none() {
                return Err(ApiError::NotFound(format!("Model {model_id} not found")));
            }
        }

        let now = Utc::now();
        let usage_date = match payload.usage_date.as_deref() {
            Some(value) => {
                validator::parse_date_field("usageDate", value).map_err(|v| {
                    ApiError::ValidationError {
                        message: "1 field(s) invalid".to_string(),
                        violations: vec![v],
                    }
                })?
            }
            None => now,
        };

        let usage = FilamentUsage {
            id: Uuid::new_v4().to_string(),
            filament_spool_id: spool_id.to_string(),
            grams_used: payload.grams_used,
            usage_date,
            printer_id: payload.printer_id,
            model_id: payload.model_id,
            notes: payload.notes,
            created_at: now,
        };

        match self.spool_repo.apply_usage(usage)? {
            UsageApplyResult::Applied(usage) => {
                tracing::info!(
                    spool_id = %spool_id,
                    grams = usage.grams_used,
                    "usage recorded"
                );
                Ok(usage)
            }
            UsageApplyResult::SpoolMissing => {
                Err(ApiError::NotFound(format!("Filament {spool_id} not found")))
            }
            UsageApplyResult::Insufficient { remaining } => Err(ApiError::InsufficientFilament {
                requested: payload.grams_used,
                remaining,
            }),
        }
    }
}
