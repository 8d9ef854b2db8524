//! Plain-data HTTP types shared by the request builder and the transport.
//!
//! # Design
//! Requests and responses are described as plain data so the orchestration
//! pipeline stays deterministic: everything up to the transport call can be
//! built and inspected without touching the network, and any transport
//! implementation can execute an `OutboundRequest` without knowing how it
//! was addressed or serialized.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Whether parameters for this method are serialized into the request
    /// body. Query-string methods (`Get`, `Delete`) never carry a body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP request, ready for the transport.
///
/// Immutable once constructed; ownership moves into the in-flight task at
/// dispatch. `path` records the resolved path before the base URL was
/// applied, so response descriptors can match against it.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response as raw data, before any object mapping.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
