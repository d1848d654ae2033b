use thiserror::Error;

/// Failures of the extraction pipeline.
///
/// Empty input and "nothing found" are not errors; they are ordinary empty
/// results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A resolved span names a skill that the catalog does not contain. This
    /// means the patterns were compiled from a different catalog.
    #[error("catalog inconsistency: skill '{skill_id}' is not in the catalog")]
    CatalogInconsistency { skill_id: String },
}

/// Failures while loading a catalog or (de)serializing compiled patterns.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
