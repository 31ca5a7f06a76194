use serde_json::{Map, Value};

use super::clean::VALUES_KEY;

/// Every list response layout the backend is known to produce, in match
/// priority order. `classify` returns the first layout that fits.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{ items: [...], pagination: { page, pageSize, total, totalPages } }`
    Paged {
        items: Value,
        pagination: Option<Map<String, Value>>,
    },
    /// `{ $values: [...] }`
    Values { items: Value },
    /// `{ jobs: { $values: [...] }, totalCount, page, pageSize, totalPages }`
    Collection {
        key: String,
        items: Value,
        meta: Map<String, Value>,
    },
    /// `{ pagination: {...}, data: [...] }`
    Legacy {
        items: Value,
        pagination: Map<String, Value>,
    },
    /// `[...]`
    Bare { items: Value },
    Unrecognized,
}

impl ResponseShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paged { .. } => "paged",
            Self::Values { .. } => "values",
            Self::Collection { .. } => "collection",
            Self::Legacy { .. } => "legacy",
            Self::Bare { .. } => "bare",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classifies a raw list response. A non-null `data` property is unwrapped
/// once before matching; a `pagination` sibling of that `data` is kept for the
/// legacy layout.
pub fn classify(raw: Value, collection_hint: Option<&str>) -> ResponseShape {
    let (outer_pagination, payload) = match raw {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => (take_object(&mut map, "pagination"), data),
            _ => (None, Value::Object(map)),
        },
        other => (None, other),
    };

    match payload {
        Value::Object(mut map) => {
            if is_list_like(map.get("items")) {
                let items = map.remove("items").unwrap_or(Value::Null);
                let pagination = take_object(&mut map, "pagination").or(outer_pagination);
                return ResponseShape::Paged { items, pagination };
            }

            if matches!(map.get(VALUES_KEY), Some(Value::Array(_))) {
                return ResponseShape::Values {
                    items: Value::Object(map),
                };
            }

            if let Some(key) = collection_key(&map, collection_hint) {
                let items = map.remove(&key).unwrap_or(Value::Null);
                return ResponseShape::Collection {
                    key,
                    items,
                    meta: map,
                };
            }

            let has_pagination = matches!(map.get("pagination"), Some(Value::Object(_)));
            if has_pagination && is_list_like(map.get("data")) {
                let items = map.remove("data").unwrap_or(Value::Null);
                let pagination = take_object(&mut map, "pagination").unwrap_or_default();
                return ResponseShape::Legacy { items, pagination };
            }

            ResponseShape::Unrecognized
        }
        items @ Value::Array(_) => match outer_pagination {
            Some(pagination) => ResponseShape::Legacy { items, pagination },
            None => ResponseShape::Bare { items },
        },
        _ => ResponseShape::Unrecognized,
    }
}

fn take_object(map: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match map.remove(key) {
        Some(Value::Object(inner)) => Some(inner),
        _ => None,
    }
}

fn is_values_wrapper(value: &Value) -> bool {
    matches!(value, Value::Object(map) if matches!(map.get(VALUES_KEY), Some(Value::Array(_))))
}

/// An array, or a `$values` wrapper standing in for one.
fn is_list_like(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(_)) => true,
        Some(other) => is_values_wrapper(other),
        None => false,
    }
}

fn collection_key(map: &Map<String, Value>, hint: Option<&str>) -> Option<String> {
    if let Some(hint) = hint {
        if map.get(hint).is_some_and(is_values_wrapper) {
            return Some(hint.to_string());
        }
    }

    map.iter()
        .find(|(_, value)| is_values_wrapper(value))
        .map(|(key, _)| key.clone())
}
