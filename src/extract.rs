//! Tolerant field extraction from backend responses.
//!
//! The services disagree on field names (`id` vs `_id`, `token` vs
//! `accessToken`) and on id encodings (hex string vs `{"$oid": ..}`), so every
//! lookup tries a list of candidate keys and takes the first usable value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::JWT_COOKIE;

pub const ID_KEYS: &[&str] = &["id", "_id", "userId", "objectId"];
pub const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token", "jwt"];
pub const NAME_KEYS: &[&str] = &["name", "groupName", "title"];
pub const COMMON_NAME_KEYS: &[&str] = &["commonName", "common_name", "name"];

/// Keys under which list endpoints sometimes wrap their array
const LIST_WRAPPERS: &[&str] = &["content", "items", "data", "results"];
/// Keys under which single-record responses sometimes nest the record
const RECORD_WRAPPERS: &[&str] = &["user", "data"];

static JWT_COOKIE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:^|;\s*){}=([^;\s]+)", regex::escape(JWT_COOKIE)))
        .expect("static cookie regex")
});

/// Parse a response body; empty is `null`, non-JSON text is kept as a string.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Render an id-like value as a string.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .or_else(|| map.get("id"))
            .and_then(scalar_to_string),
        _ => None,
    }
}

/// First key in `keys` holding a usable value.
pub fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    let obj = value.as_object()?;
    keys.iter().find_map(|k| obj.get(*k).and_then(scalar_to_string))
}

pub fn extract_id(value: &Value) -> Option<String> {
    first_str(value, ID_KEYS).or_else(|| {
        RECORD_WRAPPERS
            .iter()
            .find_map(|w| value.get(*w).and_then(|inner| first_str(inner, ID_KEYS)))
    })
}

pub fn extract_token(value: &Value) -> Option<String> {
    first_str(value, TOKEN_KEYS)
}

/// Value of the `jwt` cookie among raw `Set-Cookie` header values.
pub fn token_from_set_cookie<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().find_map(|raw| {
        JWT_COOKIE_RE
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn names_match(candidate: &str, wanted: &str) -> bool {
    candidate.trim().eq_ignore_ascii_case(wanted.trim())
}

fn as_list(value: &Value) -> Option<&Vec<Value>> {
    value.as_array().or_else(|| {
        LIST_WRAPPERS
            .iter()
            .find_map(|w| value.get(*w).and_then(Value::as_array))
    })
}

/// Id of the element in a list response whose name matches `name`.
pub fn find_id_by_name(list: &Value, name_keys: &[&str], name: &str) -> Option<String> {
    as_list(list)?.iter().find_map(|item| {
        let candidate = first_str(item, name_keys)?;
        if names_match(&candidate, name) {
            extract_id(item)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_str_tries_keys_in_order() {
        let v = json!({"accessToken": "abc", "jwt": "zzz"});
        assert_eq!(extract_token(&v).as_deref(), Some("abc"));
        assert_eq!(first_str(&json!({"token": ""}), TOKEN_KEYS), None);
        assert_eq!(first_str(&json!("plain text"), TOKEN_KEYS), None);
    }

    #[test]
    fn ids_come_in_several_shapes() {
        assert_eq!(extract_id(&json!({"_id": {"$oid": "65ab"}})).as_deref(), Some("65ab"));
        assert_eq!(extract_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(extract_id(&json!({"user": {"userId": "u1"}})).as_deref(), Some("u1"));
        assert_eq!(extract_id(&json!({"id": null})), None);
    }

    #[test]
    fn parse_body_keeps_text_and_empty() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(b"User registered"), json!("User registered"));
        assert_eq!(parse_body(br#"{"id":"x"}"#), json!({"id": "x"}));
    }

    #[test]
    fn jwt_cookie_is_found_among_set_cookie_headers() {
        let headers = [
            "JSESSIONID=123; Path=/",
            "jwt=eyJhbGciOi.payload.sig; Path=/; HttpOnly; Max-Age=604800",
        ];
        assert_eq!(
            token_from_set_cookie(headers.iter().copied()).as_deref(),
            Some("eyJhbGciOi.payload.sig")
        );
        assert_eq!(token_from_set_cookie(["notjwt=1"].iter().copied()), None);
        assert_eq!(token_from_set_cookie(["jwt=; Max-Age=0"].iter().copied()), None);
    }

    #[test]
    fn find_by_name_is_case_and_space_insensitive() {
        let list = json!([
            {"id": "b1", "commonName": "Mallard"},
            {"_id": "b2", "commonName": " Barred Owl "},
        ]);
        assert_eq!(
            find_id_by_name(&list, COMMON_NAME_KEYS, "barred owl").as_deref(),
            Some("b2")
        );
        assert_eq!(find_id_by_name(&list, COMMON_NAME_KEYS, "Blue Jay"), None);
    }

    #[test]
    fn find_by_name_unwraps_paged_lists() {
        let page = json!({"content": [{"id": "g1", "name": "DFW Birders"}], "totalPages": 1});
        assert_eq!(find_id_by_name(&page, NAME_KEYS, "DFW Birders").as_deref(), Some("g1"));
    }
}
