//! Utility Functions
//!
//! Name conversions and string splitting shared by the compile steps.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for dash-case to camelCase conversion
static DASH_CASE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+([a-z0-9])").unwrap());

/// Regex for camelCase to dash-case conversion
static CAMEL_CASE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").unwrap());

/// Convert dash-case to camelCase
pub fn dash_case_to_camel_case(input: &str) -> String {
    DASH_CASE_REGEXP
        .replace_all(input, |caps: &regex::Captures| caps[1].to_uppercase())
        .to_string()
}

/// Convert camelCase to dash-case
pub fn camel_case_to_dash_case(input: &str) -> String {
    CAMEL_CASE_REGEXP
        .replace_all(input, |caps: &regex::Captures| {
            format!("-{}", caps[1].to_lowercase())
        })
        .to_string()
}

/// Split string at colon
pub fn split_at_colon(input: &str, default_values: &[Option<&str>]) -> Vec<Option<String>> {
    split_at(input, ':', default_values)
}

fn split_at(input: &str, character: char, default_values: &[Option<&str>]) -> Vec<Option<String>> {
    if let Some(char_index) = input.find(character) {
        vec![
            Some(input[..char_index].trim().to_string()),
            Some(input[char_index + 1..].trim().to_string()),
        ]
    } else {
        default_values
            .iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }
}

/// Parse a directive property declaration of the form `dirProp: elProp` or
/// `prop`, returning `(directive_property, element_property)`.
pub fn parse_property_mapping(declaration: &str) -> (String, String) {
    let parts = split_at_colon(declaration, &[Some(declaration.trim()), Some(declaration.trim())]);
    let dir_prop = parts[0].clone().unwrap_or_default();
    let el_prop = parts[1].clone().unwrap_or_else(|| dir_prop.clone());
    (dir_prop, el_prop)
}
