// ==========================================
// spooltrack - core library
// ==========================================
// Inventory service for 3D-printing consumables.
// Stack: axum + rusqlite
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Database infrastructure (connection init / unified PRAGMAs / schema)
pub mod db;

// API layer - application services
pub mod api;

// HTTP transport - axum router and handlers
pub mod http;

// Application layer - state wiring and startup
pub mod app;

// Server configuration
pub mod config;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    FilamentSpool, FilamentUsage, MaterialRollup, Nozzle, PrintModel, Printer, SpoolFilter, Tag,
};

pub use api::{DashboardApi, FilamentApi, ModelApi, NozzleApi, PrinterApi};

pub use app::AppState;

// ==========================================
// Constants
// ==========================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name
pub const APP_NAME: &str = "spooltrack";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
