use serde::{Deserialize, Serialize};

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Path to the trained model file (JSON).
    pub model_path: String,
    /// Directory where uploaded originals are kept.
    pub upload_dir: String,
    /// Explicit tesseract binary; `PATH` lookup when unset.
    pub tesseract_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: "doctriage-model.json".to_string(),
            upload_dir: "uploads".to_string(),
            tesseract_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("DOCTRIAGE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            model_path: std::env::var("DOCTRIAGE_MODEL").unwrap_or(defaults.model_path),
            upload_dir: std::env::var("DOCTRIAGE_UPLOADS").unwrap_or(defaults.upload_dir),
            tesseract_path: std::env::var("DOCTRIAGE_TESSERACT").ok(),
        }
    }
}
