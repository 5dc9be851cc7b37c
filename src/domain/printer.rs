// ==========================================
// spooltrack - printer and nozzle domain models
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical printer. Owns zero or more nozzles; at most one of them is
/// mounted at a time (`current_nozzle_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: String,
    pub name: String,
    pub model: String,
    pub notes: Option<String>,
    pub current_nozzle_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A physical nozzle. `printer_id` is the owning printer, if any; a nozzle
/// belongs to at most one printer at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nozzle {
    pub id: String,
    pub size: f64, // mm
    pub material: String,
    pub condition: String, // "New" / "Used" / "Worn"
    pub notes: Option<String>,
    pub printer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Printer expanded with its mounted nozzle (list view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterWithNozzle {
    #[serde(flatten)]
    pub printer: Printer,
    pub current_nozzle: Option<Nozzle>,
}

/// Printer expanded with its mounted nozzle and all owned nozzles
/// (detail view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterDetail {
    #[serde(flatten)]
    pub printer: Printer,
    pub current_nozzle: Option<Nozzle>,
    pub nozzles: Vec<Nozzle>,
}

/// Nozzle expanded with its owning printer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NozzleWithPrinter {
    #[serde(flatten)]
    pub nozzle: Nozzle,
    pub printer: Option<Printer>,
}
