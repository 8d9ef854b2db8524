//! Deterministic request construction.
//!
//! # Design
//! Building never performs I/O: given a method, a resolved path, the
//! object's serialized fields, and caller parameters, the same
//! `OutboundRequest` always comes out. Query-string methods encode only
//! the caller parameters into the URL; body-carrying methods reverse-merge
//! the caller parameters under the object's fields, so an object field can
//! never be clobbered by a parameter.

use serde_json::Value;
use url::form_urlencoded;

use crate::http::{HttpMethod, OutboundRequest};
use crate::object::{reverse_merge, KeyedFields};

/// Build the outbound request for a resolved path.
///
/// `base_url` must not end with a slash and `path` must begin with one;
/// the session config normalizes both.
pub fn build_request(
    method: HttpMethod,
    base_url: &str,
    path: &str,
    object_fields: Option<KeyedFields>,
    parameters: Option<&KeyedFields>,
) -> OutboundRequest {
    let mut url = format!("{base_url}{path}");
    let mut headers = Vec::new();
    let mut body = None;

    if method.carries_body() {
        let merged = match (object_fields, parameters) {
            (None, None) => None,
            (fields, params) => {
                let empty = KeyedFields::new();
                Some(reverse_merge(
                    fields.unwrap_or_default(),
                    params.unwrap_or(&empty),
                ))
            }
        };
        if let Some(merged) = merged {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            body = Some(Value::Object(merged).to_string());
        }
    } else if let Some(params) = parameters {
        if !params.is_empty() {
            let query = encode_query(params);
            url.push('?');
            url.push_str(&query);
        }
    }

    OutboundRequest {
        method,
        url,
        path: path.to_string(),
        headers,
        body,
    }
}

fn encode_query(params: &KeyedFields) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::String(s) => serializer.append_pair(key, s),
            Value::Number(n) => serializer.append_pair(key, &n.to_string()),
            Value::Bool(b) => serializer.append_pair(key, &b.to_string()),
            // Compound values go through their compact JSON form.
            other => serializer.append_pair(key, &other.to_string()),
        };
    }
    serializer.finish()
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

    const BASE: &str = "http://localhost:3000";

    #[test]
    fn get_encodes_parameters_into_query_string() {
        let params = fields(json!({"page": 2, "q": "hello world"}));
        let req = build_request(HttpMethod::Get, BASE, "/articles", None, Some(&params));
        assert_eq!(req.url, "http://localhost:3000/articles?page=2&q=hello+world");
        assert_eq!(req.path, "/articles");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn get_without_parameters_has_bare_url() {
        let req = build_request(HttpMethod::Get, BASE, "/articles", None, None);
        assert_eq!(req.url, "http://localhost:3000/articles");
    }

    #[test]
    fn object_fields_never_enter_a_query_request() {
        let object = fields(json!({"id": 1, "title": "draft"}));
        let req = build_request(HttpMethod::Delete, BASE, "/articles/1", Some(object), None);
        assert_eq!(req.url, "http://localhost:3000/articles/1");
        assert!(req.body.is_none());
    }

    #[test]
    fn post_body_reverse_merges_parameters_under_object_fields() {
        let object = fields(json!({"a": 1, "b": 2}));
        let params = fields(json!({"b": 9, "c": 3}));
        let req = build_request(HttpMethod::Post, BASE, "/things", Some(object), Some(&params));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn patch_with_parameters_only_still_builds_a_body() {
        let params = fields(json!({"published": true}));
        let req = build_request(HttpMethod::Patch, BASE, "/articles/1", None, Some(&params));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"published": true}));
    }

    #[test]
    fn post_with_nothing_to_send_has_no_body() {
        let req = build_request(HttpMethod::Post, BASE, "/actions/reindex", None, None);
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn identical_inputs_build_identical_requests() {
        let object = fields(json!({"id": 5}));
        let a = build_request(HttpMethod::Put, BASE, "/articles/5", Some(object.clone()), None);
        let b = build_request(HttpMethod::Put, BASE, "/articles/5", Some(object), None);
        assert_eq!(a.url, b.url);
        assert_eq!(a.body, b.body);
    }
}
