//! Route table and path-pattern interpolation.
//!
//! # Design
//! Routes are registered three ways: class routes keyed by
//! (type, method) for implicit object addressing, relationship routes keyed
//! by (type, relationship name), and named routes keyed by name. A route's
//! path is a pattern whose `{field}` placeholders are interpolated against
//! the object's serialized fields at resolution time. Patterns also match
//! concrete request paths segment-wise, which is how response descriptors
//! scope themselves to particular endpoints.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::AddressingError;
use crate::http::HttpMethod;
use crate::object::KeyedFields;

/// A path template with literal segments and `{field}` placeholders.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
}

impl PathPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            raw: pattern.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.trim_matches('/').split('/')
    }

    /// Substitute every `{field}` placeholder with the object's field value.
    ///
    /// Only scalar fields (strings, numbers, booleans) can appear in a
    /// path; a placeholder naming an absent or non-scalar field is an
    /// addressing error.
    pub fn interpolate(&self, fields: &KeyedFields) -> Result<String, AddressingError> {
        let mut out = Vec::new();
        for segment in self.segments() {
            match placeholder_name(segment) {
                Some(field) => {
                    let value = fields.get(field).and_then(scalar_to_string).ok_or_else(|| {
                        AddressingError::MissingField {
                            pattern: self.raw.clone(),
                            field: field.to_string(),
                        }
                    })?;
                    out.push(value);
                }
                None => out.push(segment.to_string()),
            }
        }
        Ok(format!("/{}", out.join("/")))
    }

    /// Segment-wise match of a concrete path against this pattern.
    /// Placeholders match any single non-empty segment; a query string on
    /// the path is ignored.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let pattern_segments: Vec<&str> = self.segments().collect();
        if path_segments.len() != pattern_segments.len() {
            return false;
        }
        pattern_segments
            .iter()
            .zip(&path_segments)
            .all(|(pattern, actual)| match placeholder_name(pattern) {
                Some(_) => !actual.is_empty(),
                None => pattern == actual,
            })
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A registered route: an HTTP method bound to a path pattern.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub pattern: PathPattern,
}

impl Route {
    pub fn new(method: HttpMethod, pattern: impl Into<String>) -> Self {
        Self {
            method,
            pattern: PathPattern::new(pattern),
        }
    }
}

/// The session's route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    class_routes: HashMap<(String, HttpMethod), Route>,
    relationship_routes: HashMap<(String, String), Route>,
    named_routes: HashMap<String, Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the route used when an object of `type_name` is sent with
    /// `method` and no explicit path.
    pub fn add_class_route(
        &mut self,
        type_name: impl Into<String>,
        method: HttpMethod,
        pattern: impl Into<String>,
    ) {
        self.class_routes
            .insert((type_name.into(), method), Route::new(method, pattern));
    }

    /// Register the route used to load `relationship` of an object of
    /// `type_name`. Relationship loads are GETs.
    pub fn add_relationship_route(
        &mut self,
        type_name: impl Into<String>,
        relationship: impl Into<String>,
        pattern: impl Into<String>,
    ) {
        self.relationship_routes.insert(
            (type_name.into(), relationship.into()),
            Route::new(HttpMethod::Get, pattern),
        );
    }

    /// Register a route addressable by name.
    pub fn add_named_route(
        &mut self,
        name: impl Into<String>,
        method: HttpMethod,
        pattern: impl Into<String>,
    ) {
        self.named_routes
            .insert(name.into(), Route::new(method, pattern));
    }

    pub fn route_for_class(&self, type_name: &str, method: HttpMethod) -> Option<&Route> {
        self.class_routes.get(&(type_name.to_string(), method))
    }

    pub fn route_for_relationship(&self, type_name: &str, relationship: &str) -> Option<&Route> {
        self.relationship_routes
            .get(&(type_name.to_string(), relationship.to_string()))
    }

    pub fn route_named(&self, name: &str) -> Option<&Route> {
        self.named_routes.get(name)
    }
}
