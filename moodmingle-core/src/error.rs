use thiserror::Error;

/// Rejected before any prompt is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("Interests are required.")]
    NoInterests,
}

/// The extracted candidate text could not be parsed as JSON.
#[derive(Error, Debug)]
#[error("Failed to parse model response as JSON: {0}")]
pub struct ParseFailure(#[from] pub serde_json::Error);
