use std::env;
use std::path::PathBuf;

/// Configuration loaded from environment variables
pub struct Config {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub locale: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All variables are optional and fall back to local defaults:
    /// - LEADFLOW_DB_PATH - SQLite database with the CRM tables (default: data/crm.db)
    /// - LEADFLOW_EXPORT_DIR - output directory for export files (default: exports)
    /// - LEADFLOW_LOCALE - display locale for translated names (default: en_US)
    pub fn from_env() -> Self {
        let db_path = env::var("LEADFLOW_DB_PATH")
            .unwrap_or_else(|_| "data/crm.db".to_string())
            .into();

        let export_dir = env::var("LEADFLOW_EXPORT_DIR")
            .unwrap_or_else(|_| "exports".to_string())
            .into();

        let locale = env::var("LEADFLOW_LOCALE").unwrap_or_else(|_| "en_US".to_string());

        Self {
            db_path,
            export_dir,
            locale,
        }
    }
}
