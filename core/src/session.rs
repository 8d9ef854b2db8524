//! The session context and its operation entry points.
//!
//! # Design
//! `SessionConfig` is an immutable snapshot: base URL, route table,
//! response descriptors, serializer, mapper. `ObjectSession` holds the
//! current snapshot behind an `ArcSwap`; reconfiguration installs a whole
//! new snapshot, and every operation loads the snapshot exactly once, so
//! concurrent tasks each observe a consistent configuration without any
//! locking.
//!
//! Every entry point is the same pipeline — resolve addressing, serialize
//! the object, build the request, spawn the worker — and returns its task
//! handle synchronously. Addressing and serialization failures are
//! returned from the call itself, before any network side effect; all
//! later failures arrive through the task's outcome.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::addressing::{resolve, AddressingTarget};
use crate::error::ClientError;
use crate::http::{HttpMethod, OutboundRequest};
use crate::mapper::{KeyPathMapper, ResponseDescriptor, ResponseMapper};
use crate::object::{KeyedFields, Routable};
use crate::request::build_request;
use crate::serializer::{JsonSerializer, RequestSerializer};
use crate::task::{self, RequestTask};
use crate::transport::{HttpTransport, Transport};

/// One immutable configuration snapshot for a session.
#[derive(Clone)]
pub struct SessionConfig {
    base_url: String,
    router: crate::router::Router,
    descriptors: Vec<ResponseDescriptor>,
    serializer: Arc<dyn RequestSerializer>,
    mapper: Arc<dyn ResponseMapper>,
}

impl SessionConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            router: crate::router::Router::new(),
            descriptors: Vec::new(),
            serializer: Arc::new(JsonSerializer),
            mapper: Arc::new(KeyPathMapper),
        }
    }

    pub fn with_router(mut self, router: crate::router::Router) -> Self {
        self.router = router;
        self
    }

    pub fn with_descriptor(mut self, descriptor: ResponseDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn RequestSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_mapper(mut self, mapper: Arc<dyn ResponseMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn router(&self) -> &crate::router::Router {
        &self.router
    }

    pub fn descriptors(&self) -> &[ResponseDescriptor] {
        &self.descriptors
    }
}

/// Long-lived session: a transport plus the current configuration
/// snapshot. Safe to share across concurrent operations.
pub struct ObjectSession {
    transport: Arc<dyn Transport>,
    config: ArcSwap<SessionConfig>,
}

impl ObjectSession {
    /// Session over the default reqwest-backed transport.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Install a new configuration snapshot. In-flight tasks keep the
    /// snapshot they started with.
    pub fn reconfigure(&self, config: SessionConfig) {
        self.config.store(Arc::new(config));
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> Arc<SessionConfig> {
        self.config.load_full()
    }

    /// Dispatch a caller-built request, mapping its response like any
    /// other operation.
    pub fn data_task(&self, request: OutboundRequest) -> RequestTask {
        let config = self.config.load_full();
        task::dispatch(
            request,
            Arc::clone(&self.transport),
            Arc::clone(&config.mapper),
            config.descriptors.clone(),
        )
    }

    /// GET the resource at a literal path.
    pub fn get_at_path(
        &self,
        path: &str,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(HttpMethod::Get, AddressingTarget::Path(path), parameters)
    }

    /// GET the named relationship of an object, via the relationship
    /// route registered for the object's type.
    pub fn get_relationship(
        &self,
        object: &dyn Routable,
        relationship: &str,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Get,
            AddressingTarget::Relationship {
                object,
                name: relationship,
            },
            parameters,
        )
    }

    /// GET the route registered under `name`, optionally interpolated
    /// against an object's fields.
    pub fn get_route_named(
        &self,
        name: &str,
        object: Option<&dyn Routable>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Get,
            AddressingTarget::RouteNamed { name, object },
            parameters,
        )
    }

    pub fn get(
        &self,
        object: &dyn Routable,
        path: Option<&str>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Get,
            AddressingTarget::Object { object, path },
            parameters,
        )
    }

    pub fn post(
        &self,
        object: &dyn Routable,
        path: Option<&str>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Post,
            AddressingTarget::Object { object, path },
            parameters,
        )
    }

    pub fn put(
        &self,
        object: &dyn Routable,
        path: Option<&str>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Put,
            AddressingTarget::Object { object, path },
            parameters,
        )
    }

    pub fn patch(
        &self,
        object: &dyn Routable,
        path: Option<&str>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Patch,
            AddressingTarget::Object { object, path },
            parameters,
        )
    }

    pub fn delete(
        &self,
        object: &dyn Routable,
        path: Option<&str>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        self.object_task(
            HttpMethod::Delete,
            AddressingTarget::Object { object, path },
            parameters,
        )
    }

    /// The shared pipeline behind every addressed entry point.
    fn object_task(
        &self,
        method: HttpMethod,
        target: AddressingTarget<'_>,
        parameters: Option<&KeyedFields>,
    ) -> Result<RequestTask, ClientError> {
        let config = self.config.load_full();

        let fields = match target.object() {
            Some(object) => Some(config.serializer.serialize(object, method)?),
            None => None,
        };
        let path = resolve(&target, method, &config.router, fields.as_ref())?;
        let object_fields = if method.carries_body() { fields } else { None };
        let request = build_request(method, &config.base_url, &path, object_fields, parameters);

        Ok(task::dispatch(
            request,
            Arc::clone(&self.transport),
            Arc::clone(&config.mapper),
            config.descriptors.clone(),
        ))
    }
}
