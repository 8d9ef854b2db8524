//! Error types for the orchestration pipeline.
//!
//! # Design
//! Failures keep their originating layer: `AddressingError` for route
//! resolution (always raised synchronously, before any network side
//! effect), `TransportError` for the network round-trip, `MappingError`
//! for response deserialization. All three fold into `ClientError`, the
//! single type delivered through a task's outcome channel — callers
//! distinguish sources by variant, never by which channel fired.

use crate::http::HttpMethod;

/// Route resolution failed. Raised before dispatch; getting one of these
/// means the session's route table and the call disagree, not that the
/// network misbehaved.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddressingError {
    /// No class route registered for (type, method).
    #[error("no route registered for type `{type_name}` and method {method}")]
    NoRouteForType {
        type_name: String,
        method: HttpMethod,
    },

    /// No relationship route registered for (type, relationship).
    #[error("no route registered for relationship `{relationship}` of type `{type_name}`")]
    NoRouteForRelationship {
        type_name: String,
        relationship: String,
    },

    /// No named route registered under this name.
    #[error("no route registered with name `{0}`")]
    UnknownRoute(String),

    /// A named route exists but is bound to a different HTTP method.
    #[error("route `{name}` is registered for {registered}, not {requested}")]
    MethodMismatch {
        name: String,
        registered: HttpMethod,
        requested: HttpMethod,
    },

    /// A path pattern referenced a field the object does not provide.
    #[error("path pattern `{pattern}` references missing field `{field}`")]
    MissingField { pattern: String, field: String },
}

/// The network round-trip failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection-level failure: DNS, refused connection, broken stream.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the transport's deadline.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status. The body is preserved
    /// so error payloads stay observable to the caller.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// The response arrived but could not be mapped into objects.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(String),

    /// A matching descriptor's key path was absent from the payload.
    #[error("key path `{0}` not found in response payload")]
    KeyPathNotFound(String),
}

/// Errors surfaced to callers of the session entry points.
///
/// `Addressing` and `Serialization` are returned synchronously from the
/// entry point itself; `Transport`, `Mapping`, and `Cancelled` arrive
/// through the task's outcome.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("addressing failed: {0}")]
    Addressing(#[from] AddressingError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("mapping failed: {0}")]
    Mapping(#[from] MappingError),

    /// The object could not be parameterized for the request body.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The task was cancelled before a response was mapped.
    #[error("task cancelled")]
    Cancelled,
}

impl ClientError {
    /// True if this failure came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// True if the response arrived but failed object mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, ClientError::Mapping(_))
    }

    /// True if the failure was raised before any network side effect.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            ClientError::Addressing(_) | ClientError::Serialization(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
