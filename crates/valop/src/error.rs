//! Errors raised while registering or dispatching operations.

use thiserror::Error;

/// Errors from the HTTP collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout, or body read failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

/// Errors that can occur when registering or executing an operation.
///
/// Every variant is a per-call failure; nothing is retried internally.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No operation is registered under this name
    #[error("Operation not configured: {name}")]
    UnknownOperation { name: String },

    /// Name was registered twice while building the registry
    #[error("Operation '{name}' is already registered")]
    DuplicateOperation { name: String },

    /// Typed call asked for a shape other than the registered one
    #[error("Operation '{operation}' decodes to {registered}, not {requested}")]
    ShapeMismatch {
        operation: String,
        registered: &'static str,
        requested: &'static str,
    },

    /// Filter could not be serialized to JSON
    #[error("Failed to encode filter for '{operation}': {source}")]
    Encode {
        operation: String,
        source: serde_json::Error,
    },

    #[error("Operation '{operation}' failed: {source}")]
    Transport {
        operation: String,
        source: TransportError,
    },

    /// Response body does not match the registered shape
    #[error("Response for '{operation}' is not a valid {shape}: {source}")]
    Decode {
        operation: String,
        shape: &'static str,
        source: serde_json::Error,
    },
}

impl DispatchError {
    /// Name of the operation this error concerns.
    pub fn operation(&self) -> &str {
        match self {
            DispatchError::UnknownOperation { name } | DispatchError::DuplicateOperation { name } => {
                name
            }
            DispatchError::ShapeMismatch { operation, .. }
            | DispatchError::Encode { operation, .. }
            | DispatchError::Transport { operation, .. }
            | DispatchError::Decode { operation, .. } => operation,
        }
    }

    /// HTTP status, when the server answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Transport {
                source: TransportError::Http { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
