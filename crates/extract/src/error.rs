//! Error taxonomy for extraction runs.

use thiserror::Error;

/// A document that does not satisfy the knowledge graph schema.
///
/// Each variant is one rule; `path` points at the offending field using
/// `entities[3].type` style notation (`$` is the document root).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{path}: not valid JSON: {message}")]
    InvalidJson { path: String, message: String },

    #[error("{path}: expected a JSON object")]
    NotAnObject { path: String },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("{path}: unknown entity type {value:?} (expected Company, RiskFactor or Amount)")]
    UnknownEntityType { path: String, value: String },

    #[error("{path}: entity id must not be empty")]
    EmptyId { path: String },

    #[error("{path}: duplicate entity id {id:?}")]
    DuplicateId { path: String, id: String },

    #[error("{path}: unknown relationship type {value:?} (expected OWNS, HAS, FACES or PARTNERS_WITH)")]
    UnknownRelationshipType { path: String, value: String },

    #[error("{path}: references unknown entity {id:?}")]
    UnknownEntity { path: String, id: String },
}

impl ValidationError {
    pub fn path(&self) -> &str {
        match self {
            ValidationError::InvalidJson { path, .. }
            | ValidationError::NotAnObject { path }
            | ValidationError::MissingField { path }
            | ValidationError::WrongType { path, .. }
            | ValidationError::UnknownEntityType { path, .. }
            | ValidationError::EmptyId { path }
            | ValidationError::DuplicateId { path, .. }
            | ValidationError::UnknownRelationshipType { path, .. }
            | ValidationError::UnknownEntity { path, .. } => path,
        }
    }

    /// Stable name of the violated rule
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson { .. } => "invalid_json",
            ValidationError::NotAnObject { .. } => "not_an_object",
            ValidationError::MissingField { .. } => "missing_field",
            ValidationError::WrongType { .. } => "wrong_type",
            ValidationError::UnknownEntityType { .. } => "unknown_entity_type",
            ValidationError::EmptyId { .. } => "empty_id",
            ValidationError::DuplicateId { .. } => "duplicate_id",
            ValidationError::UnknownRelationshipType { .. } => "unknown_relationship_type",
            ValidationError::UnknownEntity { .. } => "unknown_entity",
        }
    }
}

/// Failure of the hosted model call. Surfaced to the caller unmodified.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} rate limit hit (HTTP 429)")]
    RateLimited { provider: &'static str },

    #[error("{provider} API error {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport { .. } | UpstreamError::RateLimited { .. } => true,
            UpstreamError::Status { status, .. } => *status >= 500,
            UpstreamError::MalformedResponse { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
