//! Identifier normalization for generated names.
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

// word boundaries: `fooBar` / `foo1Bar`, and `HTTPServer` -> `HTTP Server`
static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static ACRONYM_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])([A-Z][a-z])").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

const SPLIT: &str = "\u{0}";

/// Property keys that are not plain identifiers are emitted as string literals.
pub fn escape_object_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        serde_json::Value::from(key).to_string()
    }
}

/// Split into words on case changes and non-alphanumeric runs.
pub fn words(input: &str) -> Vec<String> {
    let marked = LOWER_UPPER.replace_all(input, "${1}\u{0}${2}");
    let marked = ACRONYM_END.replace_all(&marked, "${1}\u{0}${2}");
    let marked = NON_WORD.replace_all(&marked, SPLIT);
    marked
        .split(SPLIT)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// `pet_store` -> `PetStore`, `HTTPError` -> `HttpError`, `pet 2` -> `Pet_2`.
///
/// A word after the first that starts with a digit is prefixed with `_` so
/// the digits stay readable as a separate word.
pub fn pascal_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (index, word) in words(input).iter().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        let rest = chars.as_str().to_lowercase();
        if index > 0 && first.is_ascii_digit() {
            out.push('_');
            out.push(first);
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(&rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(escape_object_key("name"), "name");
        assert_eq!(escape_object_key("$ref_1"), "$ref_1");
        assert_eq!(escape_object_key("x-rate"), "\"x-rate\"");
        assert_eq!(escape_object_key("1st"), "\"1st\"");
        assert_eq!(escape_object_key("say \"hi\""), r#""say \"hi\"""#);
    }

    #[test]
    fn pascal() {
        assert_eq!(pascal_case("Pet"), "Pet");
        assert_eq!(pascal_case("pet_store"), "PetStore");
        assert_eq!(pascal_case("HTTPError"), "HttpError");
        assert_eq!(pascal_case("user-profile.v2"), "UserProfileV2");
        assert_eq!(pascal_case("pet 2"), "Pet_2");
        assert_eq!(pascal_case("Pet2"), "Pet2");
        assert_eq!(pascal_case("2fa_settings"), "2faSettings");
        assert_eq!(pascal_case("camelCaseName"), "CamelCaseName");
    }
}
