// ==========================================
// API integration-test helpers
// ==========================================
// Shared test environment: temp-file SQLite plus fully wired services.
// ==========================================

use tempfile::NamedTempFile;

use spooltrack::api::{CreateFilamentPayload, CreateUsagePayload};
use spooltrack::app::AppState;

/// Test environment over a temporary database file.
///
/// The temp file must stay alive as long as the state; dropping it unlinks
/// the database.
pub struct ApiTestEnv {
    pub state: AppState,
    pub db_path: String,
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Self {
        spooltrack::logging::init_test();

        let temp_file = NamedTempFile::new().expect("failed to create temp db file");
        let db_path = temp_file
            .path()
            .to_str()
            .expect("temp path not utf-8")
            .to_string();

        let state = AppState::new(&db_path).expect("failed to initialize AppState");

        Self {
            state,
            db_path,
            _temp_file: temp_file,
        }
    }
}

/// A valid create-filament payload with sensible defaults.
pub fn filament_payload(brand: &str, material: &str, color_name: &str) -> CreateFilamentPayload {
    CreateFilamentPayload {
        brand: brand.to_string(),
        material: material.to_string(),
        color_name: color_name.to_string(),
        color_hex: "#1a1a2e".to_string(),
        diameter: 1.75,
        total_weight: 1000.0,
        remaining_weight: 1000.0,
        price: 24.99,
        purchase_date: None,
        store: None,
        url: None,
        opened: None,
        opened_date: None,
        location: None,
        notes: None,
    }
}

/// A valid usage payload for the given amount.
pub fn usage_payload(grams: f64) -> CreateUsagePayload {
    CreateUsagePayload {
        grams_used: grams,
        usage_date: None,
        printer_id: None,
        model_id: None,
        notes: None,
    }
}
