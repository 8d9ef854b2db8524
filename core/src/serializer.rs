//! Request serialization seam.
//!
//! # Design
//! The serializer turns a domain object into the flat field set that feeds
//! body construction and path interpolation. It is a trait so sessions can
//! swap in alternative parameterizations; the default JSON serializer just
//! requires the object's JSON view to be an object.

use crate::error::ClientError;
use crate::http::HttpMethod;
use crate::object::{KeyedFields, Routable};

/// Produces the keyed field set for an object being sent with `method`.
pub trait RequestSerializer: Send + Sync {
    fn serialize(
        &self,
        object: &dyn Routable,
        method: HttpMethod,
    ) -> Result<KeyedFields, ClientError>;
}

/// Default serializer: the object's `to_json` view, which must be a JSON
/// object. The method is ignored; all methods share one parameterization.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RequestSerializer for JsonSerializer {
    fn serialize(
        &self,
        object: &dyn Routable,
        _method: HttpMethod,
    ) -> Result<KeyedFields, ClientError> {
        let value = object
            .to_json()
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ClientError::Serialization(format!(
                "expected a JSON object for type `{}`, got {other}",
                object.route_type()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    struct Plain;

    impl Routable for Plain {
        fn route_type(&self) -> &'static str {
            "plain"
        }

        fn to_json(&self) -> Result<Value, serde_json::Error> {
            Ok(json!({"name": "plain", "rank": 1}))
        }
    }

    struct Scalar;

    impl Routable for Scalar {
        fn route_type(&self) -> &'static str {
            "scalar"
        }

        fn to_json(&self) -> Result<Value, serde_json::Error> {
            Ok(json!(42))
        }
    }

    #[test]
    fn object_view_becomes_keyed_fields() {
        let fields = JsonSerializer.serialize(&Plain, HttpMethod::Post).unwrap();
        assert_eq!(fields["name"], "plain");
        assert_eq!(fields["rank"], 1);
    }

    #[test]
    fn non_object_view_is_a_serialization_error() {
        let err = JsonSerializer.serialize(&Scalar, HttpMethod::Post).unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
