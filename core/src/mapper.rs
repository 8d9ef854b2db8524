//! Response descriptors and the object-mapping seam.
//!
//! # Design
//! A response descriptor scopes itself by request path pattern and status
//! codes, and names the key path in the payload it maps plus the bucket in
//! the `MappingResult` its objects land in. The mapper trait keeps the
//! orchestrator ignorant of how payloads become objects; the default
//! `KeyPathMapper` does JSON key-path extraction.
//!
//! An empty mapping result is a valid success: a 204-style empty body, or
//! a response no descriptor claims, maps to an empty result rather than an
//! error. Callers who require objects should check `is_empty`.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::MappingError;
use crate::http::RawResponse;
use crate::router::PathPattern;

/// Declares how responses from some endpoint are mapped.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    /// Bucket in the `MappingResult` that receives this descriptor's
    /// objects.
    pub key: String,
    /// Restricts the descriptor to requests whose resolved path matches.
    /// `None` matches any path.
    pub path_pattern: Option<PathPattern>,
    /// Restricts the descriptor to these status codes. `None` matches any.
    pub statuses: Option<Vec<u16>>,
    /// Dotted path into the payload to the value being mapped. `None`
    /// maps the payload root.
    pub key_path: Option<String>,
}

impl ResponseDescriptor {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path_pattern: None,
            statuses: None,
            key_path: None,
        }
    }

    pub fn with_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.path_pattern = Some(PathPattern::new(pattern));
        self
    }

    pub fn with_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.statuses = Some(statuses.into());
        self
    }

    pub fn with_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    pub fn matches(&self, request_path: &str, status: u16) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&status) {
                return false;
            }
        }
        match &self.path_pattern {
            Some(pattern) => pattern.matches(request_path),
            None => true,
        }
    }
}

/// Keyed collection of mapped objects, one bucket per descriptor key.
#[derive(Debug, Clone, Default)]
pub struct MappingResult {
    objects: HashMap<String, Vec<Value>>,
}

impl MappingResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, objects: Vec<Value>) {
        self.objects.entry(key.into()).or_default().extend(objects);
    }

    /// Objects mapped under `key`; empty slice if the key never matched.
    pub fn objects_for(&self, key: &str) -> &[Value] {
        self.objects.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, key: &str) -> Option<&Value> {
        self.objects_for(key).first()
    }

    /// Deserialize the objects under `key` into a concrete type.
    pub fn objects_as<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, MappingError> {
        self.objects_for(key)
            .iter()
            .map(|v| serde_json::from_value(v.clone()).map_err(|e| MappingError::Parse(e.to_string())))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Maps a raw response against the session's descriptors.
pub trait ResponseMapper: Send + Sync {
    fn map(
        &self,
        request_path: &str,
        response: &RawResponse,
        descriptors: &[ResponseDescriptor],
    ) -> Result<MappingResult, MappingError>;
}

/// Default mapper: JSON parse + key-path extraction per matching
/// descriptor. Arrays contribute their elements; any other value
/// contributes one object.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPathMapper;

impl ResponseMapper for KeyPathMapper {
    fn map(
        &self,
        request_path: &str,
        response: &RawResponse,
        descriptors: &[ResponseDescriptor],
    ) -> Result<MappingResult, MappingError> {
        let mut result = MappingResult::new();
        if response.body.trim().is_empty() {
            return Ok(result);
        }
        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| MappingError::Parse(e.to_string()))?;

        for descriptor in descriptors {
            if !descriptor.matches(request_path, response.status) {
                continue;
            }
            let value = match &descriptor.key_path {
                Some(key_path) => value_at_key_path(&payload, key_path)
                    .ok_or_else(|| MappingError::KeyPathNotFound(key_path.clone()))?,
                None => &payload,
            };
            let objects = match value {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            result.insert(descriptor.key.clone(), objects);
        }
        Ok(result)
    }
}

fn value_at_key_path<'a>(payload: &'a Value, key_path: &str) -> Option<&'a Value> {
    key_path
        .split('.')
        .try_fold(payload, |value, key| value.get(key))
}
