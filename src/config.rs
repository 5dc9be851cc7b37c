// ==========================================
// spooltrack - server configuration
// ==========================================
// Env-first configuration with sensible fallbacks.
// ==========================================

use std::path::PathBuf;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database file path
    pub db_path: String,
    /// Listen address, e.g. "127.0.0.1:3000"
    pub listen_addr: String,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// # Environment
    /// - SPOOLTRACK_DB: database file path (default: user data dir)
    /// - SPOOLTRACK_ADDR: listen address (default: 127.0.0.1:3000)
    pub fn from_env() -> Self {
        let db_path = match std::env::var("SPOOLTRACK_DB") {
            Ok(path) if !path.trim().is_empty() => path.trim().to_string(),
            _ => get_default_db_path(),
        };

        let listen_addr = match std::env::var("SPOOLTRACK_ADDR") {
            Ok(addr) if !addr.trim().is_empty() => addr.trim().to_string(),
            _ => "127.0.0.1:3000".to_string(),
        };

        Self {
            db_path,
            listen_addr,
        }
    }
}

/// Default database path under the user data directory.
///
/// Falls back to the working directory when no data dir is available
/// (e.g. stripped-down containers).
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./spooltrack.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("spooltrack");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("spooltrack.db");
        }
    }

    path.to_string_lossy().to_string()
}
