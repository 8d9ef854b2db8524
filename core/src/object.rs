//! The domain-object seam: how the pipeline sees caller types.
//!
//! # Design
//! The orchestrator never knows concrete domain types. `Routable` gives it
//! the two things it needs: a stable type key for route lookup and a JSON
//! view of the object's fields for serialization and path interpolation.
//! The trait is object-safe so addressing targets can hold `&dyn Routable`.

use serde_json::Value;

/// A flat set of named fields, as produced by the request serializer and
/// consumed by the request builder and path interpolation.
pub type KeyedFields = serde_json::Map<String, Value>;

/// A domain object that can be routed and serialized by the session.
///
/// `route_type` is the key under which class and relationship routes are
/// registered for this type. `to_json` is almost always
/// `serde_json::to_value(self)`.
pub trait Routable: Send + Sync {
    fn route_type(&self) -> &'static str;

    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

/// Merge two field sets with `primary` winning every key conflict.
///
/// `fallback` contributes only keys that `primary` does not already have.
/// Body construction relies on this exact precedence: object-derived fields
/// must never be clobbered by caller-supplied parameters.
pub fn reverse_merge(primary: KeyedFields, fallback: &KeyedFields) -> KeyedFields {
    let mut merged = fallback.clone();
    for (key, value) in primary {
        merged.insert(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> KeyedFields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn primary_wins_on_conflict() {
        let primary = fields(json!({"a": 1, "b": 2}));
        let fallback = fields(json!({"b": 9, "c": 3}));
        let merged = reverse_merge(primary, &fallback);
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn fallback_fills_missing_keys_only() {
        let primary = fields(json!({"title": "kept"}));
        let fallback = fields(json!({"title": "ignored", "draft": true}));
        let merged = reverse_merge(primary, &fallback);
        assert_eq!(merged["title"], "kept");
        assert_eq!(merged["draft"], true);
    }

    #[test]
    fn empty_fallback_is_identity() {
        let primary = fields(json!({"x": [1, 2]}));
        let merged = reverse_merge(primary.clone(), &KeyedFields::new());
        assert_eq!(merged, primary);
    }
}
