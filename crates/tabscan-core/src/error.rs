#[derive(Debug, thiserror::Error)]
pub enum TabscanError {
    #[error("cannot read document: {0}")]
    Input(String),

    #[error("pdftoppm not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftoppmNotFound,

    #[error("pdftoppm failed with exit code {code}: {stderr}")]
    PdftoppmFailed { code: i32, stderr: String },

    #[error("rasterization failed: {0}")]
    Rasterization(String),

    #[error("OCR recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
