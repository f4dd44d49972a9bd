//! Error types for the IRSA client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrsaError {
    // Query construction errors
    #[error(
        "Unrecognized spatial query type '{value}'. Must be one of `Cone`, `Box`, `Polygon`, or `All-Sky`."
    )]
    InvalidSpatial { value: String },

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Dimension not in proper units: {input}")]
    Units { input: String },

    #[error("Cannot parse '{input}' as a sky coordinate: {reason}")]
    CoordinateParse { input: String, reason: String },

    // Remote service errors
    #[error("Catalog not found: {catalog}")]
    CatalogNotFound { catalog: String },

    #[error("Malformed coordinate/object name")]
    MalformedCoordinates,

    #[error("Output table size limit exceeded; narrow the search or lower the row limit")]
    LimitExceeded,

    #[error("IRSA service error: {0}")]
    Remote(String),

    #[error("Failed to parse IRSA VOTable: {reason}")]
    TableParse { reason: String },

    // Transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IrsaError {
    pub(crate) fn invalid_query(reason: impl Into<String>) -> Self {
        IrsaError::InvalidQuery { reason: reason.into() }
    }

    pub(crate) fn table_parse(reason: impl Into<String>) -> Self {
        IrsaError::TableParse { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, IrsaError>;
