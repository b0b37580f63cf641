//! schema.org JSON-LD extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use crate::models::{Field, FieldMap};

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});

/// `@type` substrings that mark an object as describing the gym itself.
const BUSINESS_TYPES: &[&str] = &[
    "LocalBusiness",
    "Organization",
    "SportsActivityLocation",
    "Gym",
];

/// Extract fields from every `<script type="application/ld+json">` block.
///
/// Blocks that fail to decode are skipped. Within and across blocks the
/// first value seen for a field wins.
pub fn parse_jsonld(document: &Html) -> FieldMap {
    let mut fields = FieldMap::new();

    for script in document.select(&LD_JSON) {
        let raw: String = script.text().collect();
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        for item in candidates(value) {
            if is_business(&item) {
                read_business(&item, &mut fields);
            }
        }
    }

    if !fields.is_empty() {
        debug!("JSON-LD supplied {} fields", fields.len());
    }
    fields
}

/// Top-level object or array, with any `@graph` members appended.
fn candidates(value: Value) -> Vec<Value> {
    let mut items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let graphs: Vec<Value> = items
        .iter()
        .filter_map(|item| item.get("@graph").and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect();
    items.extend(graphs);
    items
}

fn is_business(item: &Value) -> bool {
    let Some(type_node) = item.get("@type").or_else(|| item.get("type")) else {
        return false;
    };
    let type_tag = match type_node {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    };
    BUSINESS_TYPES.iter().any(|t| type_tag.contains(t))
}

fn read_business(item: &Value, fields: &mut FieldMap) {
    if let Some(name) = item.get("name").and_then(Value::as_str) {
        fields.fill(Field::Name, name.trim());
    }

    match item.get("address") {
        Some(Value::Object(address)) => {
            let joined = ["addressRegion", "addressLocality", "streetAddress"]
                .iter()
                .filter_map(|key| address.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            fields.fill(Field::Address, joined);
        }
        Some(Value::String(address)) => {
            fields.fill(Field::Address, address.trim());
        }
        _ => {}
    }

    if let Some(tel) = item.get("telephone").or_else(|| item.get("tel")) {
        fields.fill(Field::Phones, value_text(tel));
    }

    if let Some(hours) = item
        .get("openingHours")
        .or_else(|| item.get("openingHoursSpecification"))
    {
        fields.fill(Field::Hours, value_text(hours));
    }

    if let Some(same_as) = item.get("sameAs").and_then(Value::as_array) {
        for link in same_as.iter().map(value_text) {
            if link.to_lowercase().contains("instagram") {
                fields.fill(Field::Instagram, link);
            } else if link.starts_with("http") {
                fields.fill(Field::Website, link);
            }
        }
    }

    if let Some(url) = item.get("url").and_then(Value::as_str)
        && url.starts_with("http")
    {
        fields.fill(Field::Website, url);
    }
}

/// Strings as-is, `null` as empty, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
