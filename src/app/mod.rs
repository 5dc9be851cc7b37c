// ==========================================
// spooltrack - application layer
// ==========================================
// Wires repositories and services together for the HTTP server.
// ==========================================

pub mod state;

pub use state::AppState;
