// ==========================================
// spooltrack - spool domain model
// ==========================================
// Wire format is camelCase JSON; timestamps are UTC.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// FilamentSpool - a physical spool of material
// ==========================================
// Invariant: 0 <= remaining_weight <= total_weight at all times.
// `opened` is monotonic by convention (the API does not enforce it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentSpool {
    pub id: String,

    // Identity of the material
    pub brand: String,
    pub material: String, // free-text category, e.g. "PLA"
    pub color_name: String,
    pub color_hex: String, // hex triplet string, e.g. "#1A2B3C"
    pub diameter: f64,     // mm

    // Stock accounting
    pub total_weight: f64,     // grams, at purchase
    pub remaining_weight: f64, // grams, only ever decreased by usage events
    pub price: f64,

    // Purchase metadata
    pub purchase_date: Option<DateTime<Utc>>,
    pub store: Option<String>,
    pub url: Option<String>,

    // Physical state
    pub opened: bool,
    pub opened_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// FilamentUsage - immutable usage log entry
// ==========================================
// Invariant at creation: grams_used > 0 and grams_used <= remaining_weight
// of the referenced spool; the log insert and the spool decrement are one
// atomic unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentUsage {
    pub id: String,
    pub filament_spool_id: String,
    pub grams_used: f64,
    pub usage_date: DateTime<Utc>,
    pub printer_id: Option<String>,
    pub model_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Usage entry expanded with its printer and model, as returned by
/// `GET /filaments/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentUsageDetail {
    #[serde(flatten)]
    pub usage: FilamentUsage,
    pub printer: Option<super::printer::Printer>,
    pub model: Option<super::model::PrintModel>,
}

/// Spool with its full usage history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentSpoolDetail {
    #[serde(flatten)]
    pub spool: FilamentSpool,
    pub usages: Vec<FilamentUsageDetail>,
}
