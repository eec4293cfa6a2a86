//! Error types for the runnable adapters.

use thiserror::Error;

use crate::domain::DatasetStatus;

/// Result type alias using the genoflow error type.
pub type Result<T> = std::result::Result<T, GenoflowError>;

/// Main error type for the runnable adapters.
#[derive(Error, Debug)]
pub enum GenoflowError {
    /// A required workflow parameter is absent, null, or empty.
    ///
    /// Raised during parameter marshaling, before any call to the metadata
    /// service.
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    /// A workflow parameter is present but not of the expected shape.
    #[error("Invalid value for parameter '{name}': {source}")]
    InvalidParam {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The status-transition table has no successor for this status.
    #[error("No status transition defined after '{0}'")]
    TransitionExhausted(DatasetStatus),

    /// A status string outside the fixed status set.
    #[error("Unknown dataset status: {0}")]
    UnknownStatus(String),

    /// Transport failure talking to the metadata service.
    #[error("Metadata request failed: {0}")]
    Metadata(#[from] reqwest::Error),

    /// The metadata service replied with a non-success status.
    #[error("Metadata service returned {status} for {url}: {body}")]
    MetadataStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
