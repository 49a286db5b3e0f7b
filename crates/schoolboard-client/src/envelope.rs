//! Response envelope normalization.
//!
//! Depending on the endpoint the backend answers with a bare value or with
//! `{ "data": ... }`. Everything is unwrapped here, once, before typed
//! decoding.

use serde::Deserialize;
use serde_json::Value;

use schoolboard_core::error::{ApiError, GENERIC_ERROR_MESSAGE};
use schoolboard_core::model::UserProfile;

/// Normalize a list response: a bare array, or an array under `data`.
/// Any other shape is treated as an empty list.
pub fn normalize_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("list response has no array payload, treating as empty");
                Vec::new()
            }
        },
        _ => {
            tracing::warn!("list response is not an array or object, treating as empty");
            Vec::new()
        }
    }
}

/// Normalize a single-record response: unwrap `data` when it holds an object.
pub fn normalize_item(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks for a `message` or `error` string (also inside `data`), falling
/// back to the generic message.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };
    let message = [Some(&value), value.get("data")]
        .into_iter()
        .flatten()
        .find_map(|v| {
            ["message", "error"].iter().find_map(|key| {
                v.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
            })
        })
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    message
}

/// Login payload after envelope removal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(alias = "token")]
    pub access_token: String,
    pub user: UserProfile,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Decode a login response, with or without a `data` envelope.
pub fn parse_login(body: Value) -> Result<LoginPayload, ApiError> {
    serde_json::from_value(normalize_item(body))
        .map_err(|e| ApiError::Decode(format!("invalid login response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_shapes() {
        assert_eq!(normalize_list(json!([1, 2])).len(), 2);
        assert_eq!(normalize_list(json!({"data": [1, 2, 3]})).len(), 3);
        assert!(normalize_list(json!({"data": {"items": [1]}})).is_empty());
        assert!(normalize_list(json!({"message": "ok"})).is_empty());
        assert!(normalize_list(json!(null)).is_empty());
    }

    #[test]
    fn item_shapes() {
        assert_eq!(normalize_item(json!({"data": {"id": "a"}}))["id"], "a");
        assert_eq!(normalize_item(json!({"id": "b"}))["id"], "b");
        // `data` that is not an object is part of the record
        assert_eq!(normalize_item(json!({"id": "c", "data": [1]}))["id"], "c");
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            extract_error_message(r#"{"message": "Class name already exists"}"#),
            "Class name already exists"
        );
        assert_eq!(extract_error_message(r#"{"error": "Forbidden"}"#), "Forbidden");
        assert_eq!(
            extract_error_message(r#"{"data": {"message": "Term not found"}}"#),
            "Term not found"
        );
        assert_eq!(extract_error_message(r#"{"message": "  "}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            extract_error_message(r#"{"message": "", "error": "Forbidden"}"#),
            "Forbidden"
        );
        assert_eq!(extract_error_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_error_message(""), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn login_with_envelope_and_token_alias() {
        let payload = parse_login(json!({
            "data": {
                "token": "jwt",
                "user": {"_id": "u1", "name": "Admin", "email": "a@b.co", "role": "admin"},
                "expiresIn": 3600
            }
        }))
        .unwrap();
        assert_eq!(payload.access_token, "jwt");
        assert_eq!(payload.user.id, "u1");
        assert_eq!(payload.expires_in, Some(3600));

        assert!(parse_login(json!({"user": {"id": "u1"}})).is_err());
    }
}
