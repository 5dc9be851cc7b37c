// ==========================================
// spooltrack - HTTP transport
// ==========================================
// axum router and handlers. Handlers stay thin: parse, delegate to the
// service layer, translate ApiError into a status code.
//
// Routes:
// - GET  /health
// - GET/POST /filaments, GET/PATCH/DELETE /filaments/:id,
//   POST /filaments/:id/usage
// - GET/POST /printers, GET/PATCH/DELETE /printers/:id
// - GET/POST /nozzles, GET/PATCH/DELETE /nozzles/:id
// - GET/POST /models,  GET/PATCH/DELETE /models/:id
// - GET  /dashboard/summary, GET /dashboard/materials
// ==========================================

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::{
    CreateFilamentPayload, CreateModelPayload, CreateNozzlePayload, CreatePrinterPayload,
    CreateUsagePayload, UpdateFilamentPayload, UpdateModelPayload, UpdateNozzlePayload,
    UpdatePrinterPayload,
};
use crate::app::AppState;
use crate::domain::types::SpoolFilter;

// ==========================================
// Error mapping
// ==========================================

/// Wrapper so ApiError can cross the axum boundary as a response.
pub struct HttpError(ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_)
            | ApiError::ValidationError { .. }
            | ApiError::InsufficientFilament { .. } => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_)
            | ApiError::DatabaseTransactionError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = match &self.0 {
            ApiError::ValidationError { violations, .. } => {
                json!({ "error": self.0.to_string(), "violations": violations })
            }
            _ => json!({ "error": self.0.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

type HttpResult<T> = Result<T, HttpError>;

// ==========================================
// Router
// ==========================================

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/filaments", get(list_filaments).post(create_filament))
        .route(
            "/filaments/:id",
            get(get_filament)
                .patch(update_filament)
                .delete(delete_filament),
        )
        .route("/filaments/:id/usage", axum::routing::post(record_usage))
        .route("/printers", get(list_printers).post(create_printer))
        .route(
            "/printers/:id",
            get(get_printer).patch(update_printer).delete(delete_printer),
        )
        .route("/nozzles", get(list_nozzles).post(create_nozzle))
        .route(
            "/nozzles/:id",
            get(get_nozzle).patch(update_nozzle).delete(delete_nozzle),
        )
        .route("/models", get(list_models).post(create_model))
        .route(
            "/models/:id",
            get(get_model).patch(update_model).delete(delete_model),
        )
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/dashboard/materials", get(dashboard_materials))
        .with_state(state)
}

/// Serve the router at the given address until the process is stopped.
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

// ==========================================
// Handlers
// ==========================================

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
struct ListFilamentsQuery {
    material: Option<String>,
    /// "true" / "false"; anything else means no filter.
    opened: Option<String>,
    q: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_filaments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFilamentsQuery>,
) -> HttpResult<impl IntoResponse> {
    let filter = SpoolFilter {
        material: query.material,
        opened: match query.opened.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        },
        search: query.q,
        page: query.page,
        limit: query.limit,
    };
    Ok(Json(state.filament_api.list(&filter)?))
}

async fn get_filament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.filament_api.get(&id)?))
}

async fn create_filament(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFilamentPayload>,
) -> HttpResult<impl IntoResponse> {
    let spool = state.filament_api.create(payload)?;
    Ok((StatusCode::CREATED, Json(spool)))
}

async fn update_filament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFilamentPayload>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.filament_api.update(&id, payload)?))
}

async fn delete_filament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    state.filament_api.delete(&id)?;
    Ok(Json(json!({ "deleted": id })))
}

async fn record_usage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateUsagePayload>,
) -> HttpResult<impl IntoResponse> {
    let usage = state.filament_api.record_usage(&id, payload)?;
    Ok((StatusCode::CREATED, Json(usage)))
}

// ===== printers =====

async fn list_printers(State(state): State<Arc<AppState>>) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.printer_api.list()?))
}

async fn get_printer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.printer_api.get(&id)?))
}

async fn create_printer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePrinterPayload>,
) -> HttpResult<impl IntoResponse> {
    let printer = state.printer_api.create(payload)?;
    Ok((StatusCode::CREATED, Json(printer)))
}

async fn update_printer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePrinterPayload>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.printer_api.update(&id, payload)?))
}

async fn delete_printer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    state.printer_api.delete(&id)?;
    Ok(Json(json!({ "deleted": id })))
}

// ===== nozzles =====

async fn list_nozzles(State(state): State<Arc<AppState>>) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.nozzle_api.list()?))
}

async fn get_nozzle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.nozzle_api.get(&id)?))
}

async fn create_nozzle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateNozzlePayload>,
) -> HttpResult<impl IntoResponse> {
    let nozzle = state.nozzle_api.create(payload)?;
    Ok((StatusCode::CREATED, Json(nozzle)))
}

async fn update_nozzle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNozzlePayload>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.nozzle_api.update(&id, payload)?))
}

async fn delete_nozzle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    state.nozzle_api.delete(&id)?;
    Ok(Json(json!({ "deleted": id })))
}

// ===== models =====

async fn list_models(State(state): State<Arc<AppState>>) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.model_api.list()?))
}

async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.model_api.get(&id)?))
}

async fn create_model(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateModelPayload>,
) -> HttpResult<impl IntoResponse> {
    let model = state.model_api.create(payload)?;
    Ok((StatusCode::CREATED, Json(model)))
}

async fn update_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateModelPayload>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.model_api.update(&id, payload)?))
}

async fn delete_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    state.model_api.delete(&id)?;
    Ok(Json(json!({ "deleted": id })))
}

// ===== dashboard =====

async fn dashboard_summary(State(state): State<Arc<AppState>>) -> HttpResult<impl IntoResponse> {
    Ok(Json(state.dashboard_api.summary()?))
}

#[derive(Debug, Deserialize)]
struct MaterialsQuery {
    unopened: Option<String>,
}

async fn dashboard_materials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MaterialsQuery>,
) -> HttpResult<impl IntoResponse> {
    let unopened_only = query.unopened.as_deref() == Some("true");
    Ok(Json(state.dashboard_api.materials_summary(unopened_only)?))
}
