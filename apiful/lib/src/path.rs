//! URL path templating.
//!
//! Paths use `{param}` placeholders, as in OpenAPI path templates.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

/// Characters left unescaped by URI-component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a string as a single URI component.
///
/// ## Examples
///
/// ```
/// use apiful::path::encode_uri_component;
///
/// assert_eq!(encode_uri_component("a b/c@d"), "a%20b%2Fc%40d");
/// assert_eq!(encode_uri_component("it's(ok)"), "it's(ok)");
/// ```
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Converts a parameter value to its path text.
///
/// Strings are used as-is, numbers and booleans use their literal form and
/// `null` becomes `"null"`. Arrays join their elements with `,`; objects
/// use their compact JSON text.
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(param_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Substitutes `{key}` placeholders with percent-encoded parameter values.
///
/// Every occurrence of a placeholder is replaced. Placeholders without a
/// matching parameter are left untouched, and parameters without a
/// matching placeholder are ignored.
///
/// ## Examples
///
/// ```
/// use apiful::path::resolve_path_params;
/// use serde_json::json;
///
/// let params = json!({ "petId": 42, "tag": "a b" });
/// let path = resolve_path_params("/pets/{petId}/tags/{tag}", params.as_object());
/// assert_eq!(path, "/pets/42/tags/a%20b");
///
/// assert_eq!(resolve_path_params("/pets/{petId}", None), "/pets/{petId}");
/// ```
pub fn resolve_path_params(template: &str, params: Option<&Map<String, Value>>) -> String {
    let Some(params) = params else {
        return template.to_string();
    };

    let mut path = template.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &encode_uri_component(&param_to_string(value)));
        }
    }
    path
}

/// Extracts parameter names from a path template, in order of appearance.
///
/// ## Examples
///
/// ```
/// use apiful::path::extract_path_params;
///
/// assert_eq!(extract_path_params("/models"), Vec::<&str>::new());
/// assert_eq!(
///     extract_path_params("/threads/{thread_id}/messages/{message_id}"),
///     vec!["thread_id", "message_id"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = None;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            start = Some(idx + 1);
        } else if c == '}' {
            if let Some(pos) = start.take() {
                let param = &path[pos..idx];
                if !param.is_empty() {
                    params.push(param);
                }
            }
        }
    }

    params
}

/// Joins URL segments with exactly one slash between them.
///
/// Empty segments and bare `/` segments are skipped, and a leading `/` or
/// `./` on a segment is dropped before joining.
///
/// ## Examples
///
/// ```
/// use apiful::path::join_url;
///
/// assert_eq!(join_url("https://api.example.com", ["users", "42"]), "https://api.example.com/users/42");
/// assert_eq!(join_url("/", ["echo"]), "/echo");
/// assert_eq!(join_url("/api/", ["/v1"]), "/api/v1");
/// ```
pub fn join_url<I, S>(base: &str, segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.to_string();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() || segment == "/" {
            continue;
        }
        if url.is_empty() {
            url = segment.to_string();
            continue;
        }
        let segment = segment
            .strip_prefix("./")
            .or_else(|| segment.strip_prefix('/'))
            .unwrap_or(segment);
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(segment);
    }
    url
}
