// ==========================================
// spooltrack - API layer
// ==========================================
// Application services: validation, orchestration, error translation.
// One service struct per resource, each over Arc'd repositories.
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod filament_api;
pub mod model_api;
pub mod nozzle_api;
pub mod printer_api;
pub mod validator;

pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult, FieldViolation};
pub use filament_api::{
    CreateFilamentPayload, CreateUsagePayload, FilamentApi, UpdateFilamentPayload,
};
pub use model_api::{CreateModelPayload, ModelApi, UpdateModelPayload};
pub use nozzle_api::{CreateNozzlePayload, NozzleApi, UpdateNozzlePayload};
pub use printer_api::{CreatePrinterPayload, PrinterApi, UpdatePrinterPayload};
