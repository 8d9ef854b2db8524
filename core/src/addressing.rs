//! Addressing targets and synchronous route resolution.
//!
//! # Design
//! The four ways a caller can say "where this request goes" are one sum
//! type consumed by a single exhaustive `resolve`. Resolution is pure and
//! synchronous: it happens exactly once per operation, before any network
//! side effect, so a misconfigured route table fails the call itself
//! rather than surfacing later as a spurious transport error.

use crate::error::AddressingError;
use crate::http::HttpMethod;
use crate::object::{KeyedFields, Routable};
use crate::router::Router;

/// Where to send a request.
pub enum AddressingTarget<'a> {
    /// A literal path, used verbatim; no route lookup.
    Path(&'a str),

    /// Load a named relationship of an object. The route is keyed by
    /// (object type, relationship name).
    Relationship {
        object: &'a dyn Routable,
        name: &'a str,
    },

    /// A route registered by name, optionally interpolated against an
    /// object's fields.
    RouteNamed {
        name: &'a str,
        object: Option<&'a dyn Routable>,
    },

    /// Implicit object addressing: an explicit path wins if supplied,
    /// otherwise the class route for (object type, method) is used.
    Object {
        object: &'a dyn Routable,
        path: Option<&'a str>,
    },
}

impl<'a> AddressingTarget<'a> {
    /// The object participating in addressing, if any. Its serialized
    /// fields feed path-pattern interpolation.
    pub fn object(&self) -> Option<&'a dyn Routable> {
        match self {
            AddressingTarget::Path(_) => None,
            AddressingTarget::Relationship { object, .. } => Some(*object),
            AddressingTarget::RouteNamed { object, .. } => *object,
            AddressingTarget::Object { object, .. } => Some(*object),
        }
    }
}

/// Resolve an addressing target to a concrete path.
///
/// `fields` is the serialized field set of `target.object()` (empty when
/// there is no object); placeholders in the selected route's pattern are
/// interpolated against it.
///
/// # Panics
/// An empty relationship name is a contract violation, not a runtime
/// condition, and panics.
pub fn resolve(
    target: &AddressingTarget<'_>,
    method: HttpMethod,
    router: &Router,
    fields: Option<&KeyedFields>,
) -> Result<String, AddressingError> {
    let empty = KeyedFields::new();
    let fields = fields.unwrap_or(&empty);

    match target {
        AddressingTarget::Path(path) => Ok((*path).to_string()),

        AddressingTarget::Relationship { object, name } => {
            assert!(!name.is_empty(), "relationship name must not be empty");
            let route = router
                .route_for_relationship(object.route_type(), name)
                .ok_or_else(|| AddressingError::NoRouteForRelationship {
                    type_name: object.route_type().to_string(),
                    relationship: (*name).to_string(),
                })?;
            route.pattern.interpolate(fields)
        }

        AddressingTarget::RouteNamed { name, .. } => {
            let route = router
                .route_named(name)
                .ok_or_else(|| AddressingError::UnknownRoute((*name).to_string()))?;
            if route.method != method {
                return Err(AddressingError::MethodMismatch {
                    name: (*name).to_string(),
                    registered: route.method,
                    requested: method,
                });
            }
            route.pattern.interpolate(fields)
        }

        AddressingTarget::Object { object, path } => match path {
            Some(path) => Ok((*path).to_string()),
            None => {
                let route = router
                    .route_for_class(object.route_type(), method)
                    .ok_or_else(|| AddressingError::NoRouteForType {
                        type_name: object.route_type().to_string(),
                        method,
                    })?;
                route.pattern.interpolate(fields)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    struct Article {
        id: u64,
    }

    impl Routable for Article {
        fn route_type(&self) -> &'static str {
            "article"
        }

        fn to_json(&self) -> Result<Value, serde_json::Error> {
            Ok(json!({"id": self.id}))
        }
    }

    fn fields_of(object: &dyn Routable) -> KeyedFields {
        match object.to_json().unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn router() -> Router {
        let mut router = Router::new();
        router.add_class_route("article", HttpMethod::Get, "/articles/{id}");
        router.add_class_route("article", HttpMethod::Post, "/articles");
        router.add_relationship_route("article", "comments", "/articles/{id}/comments");
        router.add_named_route("front_page", HttpMethod::Get, "/articles");
        router
    }

    #[test]
    fn explicit_path_needs_no_routes() {
        let target = AddressingTarget::Path("/anything");
        let path = resolve(&target, HttpMethod::Get, &Router::new(), None).unwrap();
        assert_eq!(path, "/anything");
    }

    #[test]
    fn explicit_path_wins_over_class_route() {
        let article = Article { id: 7 };
        let target = AddressingTarget::Object {
            object: &article,
            path: Some("/special/7"),
        };
        let fields = fields_of(&article);
        let path = resolve(&target, HttpMethod::Get, &router(), Some(&fields)).unwrap();
        assert_eq!(path, "/special/7");
    }

    #[test]
    fn object_falls_back_to_class_route() {
        let article = Article { id: 7 };
        let target = AddressingTarget::Object {
            object: &article,
            path: None,
        };
        let fields = fields_of(&article);
        let path = resolve(&target, HttpMethod::Get, &router(), Some(&fields)).unwrap();
        assert_eq!(path, "/articles/7");
    }

    #[test]
    fn object_without_route_fails() {
        let article = Article { id: 7 };
        let target = AddressingTarget::Object {
            object: &article,
            path: None,
        };
        let fields = fields_of(&article);
        let err = resolve(&target, HttpMethod::Delete, &router(), Some(&fields)).unwrap_err();
        assert!(matches!(err, AddressingError::NoRouteForType { .. }));
    }

    #[test]
    fn relationship_resolves_through_route_table() {
        let article = Article { id: 3 };
        let target = AddressingTarget::Relationship {
            object: &article,
            name: "comments",
        };
        let fields = fields_of(&article);
        let path = resolve(&target, HttpMethod::Get, &router(), Some(&fields)).unwrap();
        assert_eq!(path, "/articles/3/comments");
    }

    #[test]
    fn unregistered_relationship_fails() {
        let article = Article { id: 3 };
        let target = AddressingTarget::Relationship {
            object: &article,
            name: "author",
        };
        let fields = fields_of(&article);
        let err = resolve(&target, HttpMethod::Get, &router(), Some(&fields)).unwrap_err();
        assert!(matches!(err, AddressingError::NoRouteForRelationship { .. }));
    }

    #[test]
    #[should_panic(expected = "relationship name must not be empty")]
    fn empty_relationship_name_panics() {
        let article = Article { id: 3 };
        let target = AddressingTarget::Relationship {
            object: &article,
            name: "",
        };
        let _ = resolve(&target, HttpMethod::Get, &router(), None);
    }

    #[test]
    fn named_route_resolves() {
        let target = AddressingTarget::RouteNamed {
            name: "front_page",
            object: None,
        };
        let path = resolve(&target, HttpMethod::Get, &router(), None).unwrap();
        assert_eq!(path, "/articles");
    }

    #[test]
    fn unknown_named_route_fails() {
        let target = AddressingTarget::RouteNamed {
            name: "missing",
            object: None,
        };
        let err = resolve(&target, HttpMethod::Get, &router(), None).unwrap_err();
        assert!(matches!(err, AddressingError::UnknownRoute(_)));
    }

    #[test]
    fn named_route_method_must_agree() {
        let target = AddressingTarget::RouteNamed {
            name: "front_page",
            object: None,
        };
        let err = resolve(&target, HttpMethod::Post, &router(), None).unwrap_err();
        assert!(matches!(err, AddressingError::MethodMismatch { .. }));
    }
}
