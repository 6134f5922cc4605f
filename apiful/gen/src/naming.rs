//! Identifier derivation for generated declarations.
//!
//! Service ids become TypeScript type-name prefixes (`petStore` →
//! `PetStore`), compiler option names become CLI flags (`rootTypes` →
//! `--root-types`), and arbitrary JSON keys become property keys.

use crate::errors::GeneratorError;

/// Splits a string into words on separators and case changes.
///
/// Handles various patterns:
/// - "petStore" -> ["pet", "Store"]
/// - "OpenAI" -> ["Open", "AI"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "pet-store_v2" -> ["pet", "store", "v2"]
pub fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric() && c != '$')
        .flat_map(split_camel_case)
        .collect()
}

/// Splits a CamelCase string into individual words.
fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut word_start = 0;

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        // "petStore" -> "pet", "Store"; "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

/// Converts a string to PascalCase, keeping the rest of each word as is.
///
/// ## Examples
///
/// ```
/// use apiful_gen::naming::pascal_case;
///
/// assert_eq!(pascal_case("petStore"), "PetStore");
/// assert_eq!(pascal_case("pet-store"), "PetStore");
/// assert_eq!(pascal_case("github_v3"), "GithubV3");
/// ```
pub fn pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Converts a string to kebab-case.
///
/// ## Examples
///
/// ```
/// use apiful_gen::naming::kebab_case;
///
/// assert_eq!(kebab_case("rootTypes"), "root-types");
/// assert_eq!(kebab_case("exportType"), "export-type");
/// ```
pub fn kebab_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Returns `true` if `s` is a plain (ASCII) TypeScript identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Renders an object key, double-quoting it unless it is an identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

/// Derives the type-name prefix for a service id.
///
/// Ids are embedded in module paths such as `apiful/__petStore__`, so only
/// ASCII letters, digits, `-`, `_` and `.` are accepted.
///
/// ## Errors
///
/// Returns [`GeneratorError::InvalidServiceId`] if the id is empty, has
/// other characters, or does not produce a valid identifier.
pub fn service_identifier(id: &str) -> Result<String, GeneratorError> {
    let invalid = |reason: &str| GeneratorError::InvalidServiceId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("service id cannot be empty"));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }

    let identifier = pascal_case(id);
    if !is_identifier(&identifier) {
        return Err(invalid(&format!(
            "'{identifier}' is not a valid TypeScript identifier"
        )));
    }
    Ok(identifier)
}
