use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Enzian";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Get the application data directory
/// ~/Enzian/ on all platforms (user-visible, holds the database file)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Enzian")
}

/// Database file path. `ENZIAN_DB` overrides the default location.
pub fn database_path() -> PathBuf {
    match std::env::var("ENZIAN_DB") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("enzian.db"),
    }
}

/// Listen address. `ENZIAN_ADDR` overrides; unparseable values fall back to
/// the default with a warning.
pub fn bind_addr() -> SocketAddr {
    let configured = std::env::var("ENZIAN_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    configured.parse().unwrap_or_else(|_| {
        tracing::warn!(%configured, "Invalid ENZIAN_ADDR, using default");
        DEFAULT_BIND_ADDR.parse().expect("default address parses")
    })
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "enzian=info,tower_http=info"
}
