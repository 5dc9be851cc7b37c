// ==========================================
// spooltrack - application state
// ==========================================
// One shared connection behind a mutex; every repository and service hangs
// off it. Components receive their repositories at construction, nothing
// reaches for a global handle.
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::{DashboardApi, FilamentApi, ModelApi, NozzleApi, PrinterApi};
use crate::db;
use crate::repository::{ModelRepository, NozzleRepository, PrinterRepository, SpoolRepository};

/// Application state: all service instances plus shared resources.
pub struct AppState {
    pub db_path: String,

    pub filament_api: Arc<FilamentApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub printer_api: Arc<PrinterApi>,
    pub nozzle_api: Arc<NozzleApi>,
    pub model_api: Arc<ModelApi>,
}

impl AppState {
    /// Open (and, if needed, create) the database and wire everything up.
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        tracing::info!(db_path = %db_path, "initializing application state");

        let conn = db::open_and_init(db_path)
            .with_context(|| format!("failed to open database at {db_path}"))?;
        let conn = Arc::new(Mutex::new(conn));

        // Repository layer
        let spool_repo = Arc::new(SpoolRepository::new(conn.clone()));
        let printer_repo = Arc::new(PrinterRepository::new(conn.clone()));
        let nozzle_repo = Arc::new(NozzleRepository::new(conn.clone()));
        let model_repo = Arc::new(ModelRepository::new(conn.clone()));

        // Service layer
        let filament_api = Arc::new(FilamentApi::new(
            spool_repo.clone(),
            printer_repo.clone(),
            model_repo.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            spool_repo.clone(),
            printer_repo.clone(),
            nozzle_repo.clone(),
            model_repo.clone(),
        ));
        let printer_api = Arc::new(PrinterApi::new(printer_repo.clone(), nozzle_repo.clone()));
        let nozzle_api = Arc::new(NozzleApi::new(nozzle_repo, printer_repo));
        let model_api = Arc::new(ModelApi::new(model_repo));

        Ok(Self {
            db_path: db_path.to_string(),
            filament_api,
            dashboard_api,
            printer_api,
            nozzle_api,
            model_api,
        })
    }
}
