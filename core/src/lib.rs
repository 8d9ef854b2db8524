//! Object-mapping request orchestration for an HTTP API client.
//!
//! # Overview
//! Turns high-level intents — fetch a resource, persist an object, load a
//! relationship — into HTTP requests, dispatches them as cancellable async
//! tasks, and maps responses into keyed collections of domain objects.
//! Every operation returns its `RequestTask` handle synchronously and
//! resolves to exactly one `Result<MappingResult, ClientError>`.
//!
//! # Design
//! - Addressing (explicit path, relationship, named route, implicit object
//!   route) is one sum type resolved synchronously before any I/O.
//! - Transport, request serialization, and response mapping are traits;
//!   reqwest-, JSON-, and key-path-backed defaults ship in the crate.
//! - `SessionConfig` is an immutable snapshot swapped atomically on
//!   reconfiguration, so concurrent tasks never observe a half-updated
//!   session.
//! - Body-carrying requests reverse-merge caller parameters under
//!   object-derived fields: the object always wins on key conflicts.

pub mod addressing;
pub mod error;
pub mod http;
pub mod mapper;
pub mod object;
pub mod request;
pub mod router;
pub mod serializer;
pub mod session;
pub mod task;
pub mod transport;

pub use addressing::AddressingTarget;
pub use error::{AddressingError, ClientError, MappingError, TransportError};
pub use http::{HttpMethod, OutboundRequest, RawResponse};
pub use mapper::{KeyPathMapper, MappingResult, ResponseDescriptor, ResponseMapper};
pub use object::{reverse_merge, KeyedFields, Routable};
pub use router::{PathPattern, Route, Router};
pub use serializer::{JsonSerializer, RequestSerializer};
pub use session::{ObjectSession, SessionConfig};
pub use task::{RequestTask, TaskCanceller, TaskOutcome, TaskStatus};
pub use transport::{HttpTransport, Transport};
