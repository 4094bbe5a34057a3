use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MobilityError {
    #[error("mutool not found. Install MuPDF tools: brew install mupdf-tools (macOS) or apt install mupdf-tools (Linux)")]
    MutoolNotFound,

    #[error("mutool {command} failed with exit code {code}: {stderr}")]
    MutoolFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to read {path}: {reason}")]
    Reader { path: PathBuf, reason: String },

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("page {page}: found {labels} chart label(s) but {objects} chart object(s)")]
    LabelMismatch {
        page: usize,
        labels: usize,
        objects: usize,
    },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
