use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing workbook is missing or cannot be opened. Fatal for the
    /// request that needed it; nothing retries.
    #[error("catalog source unavailable at {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("failed to read sheet \"{sheet}\": {reason}")]
    Sheet { sheet: String, reason: String },
}

impl CatalogError {
    /// Stable machine-readable code surfaced to HTTP clients.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::SourceUnavailable { .. } => "source_unavailable",
            CatalogError::Sheet { .. } => "sheet_error",
        }
    }
}
