use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Produces the reference-preserving JSON a .NET backend emits: every object
/// gains a `$id`, every array is wrapped as `{ $id, $values }`, and with
/// sharing enabled a repeated object is written as `{ $ref }` to its first
/// occurrence.
#[derive(Debug, Default)]
pub struct ReferenceEncoder {
    next: u64,
    share: bool,
    emitted: HashMap<String, String>,
}

impl ReferenceEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder that replaces repeated objects with `$ref` back-references.
    pub fn sharing() -> Self {
        Self {
            share: true,
            ..Self::default()
        }
    }

    fn tag(&mut self) -> String {
        self.next += 1;
        self.next.to_string()
    }

    pub fn encode(&mut self, value: Value) -> Value {
        match value {
            Value::Object(map) => self.encode_object(map),
            Value::Array(items) => {
                let id = self.tag();
                let values = items.into_iter().map(|item| self.encode(item)).collect();
                let mut wrapper = Map::new();
                wrapper.insert("$id".to_string(), Value::String(id));
                wrapper.insert("$values".to_string(), Value::Array(values));
                Value::Object(wrapper)
            }
            other => other,
        }
    }

    /// Tags each element but leaves the outer array bare.
    pub fn encode_each(&mut self, items: Vec<Value>) -> Vec<Value> {
        items.into_iter().map(|item| self.encode(item)).collect()
    }

    /// Serializes `items` and wraps them as a `$values` array.
    pub fn encode_items<T: Serialize>(&mut self, items: &[T]) -> Result<Value, serde_json::Error> {
        Ok(self.encode(serde_json::to_value(items)?))
    }

    fn encode_object(&mut self, map: Map<String, Value>) -> Value {
        let fingerprint = if self.share {
            let key = Value::Object(map.clone()).to_string();
            if let Some(id) = self.emitted.get(&key) {
                let mut reference = Map::new();
                reference.insert("$ref".to_string(), Value::String(id.clone()));
                return Value::Object(reference);
            }
            Some(key)
        } else {
            None
        };

        let id = self.tag();
        if let Some(key) = fingerprint {
            self.emitted.insert(key, id.clone());
        }

        let mut encoded = Map::new();
        encoded.insert("$id".to_string(), Value::String(id));
        for (key, value) in map {
            let value = self.encode(value);
            encoded.insert(key, value);
        }
        Value::Object(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{clean_value, Normalizer, RefPolicy};
    use serde_json::json;

    #[test]
    fn arrays_become_values_wrappers() {
        let encoded = ReferenceEncoder::new().encode(json!({ "skills": ["a", "b"] }));
        assert_eq!(
            encoded,
            json!({ "$id": "1", "skills": { "$id": "2", "$values": ["a", "b"] } })
        );
    }

    #[test]
    fn cleaning_reverses_encoding() {
        let original = json!([
            { "id": "1", "tags": ["x"], "owner": { "name": "Lan" } },
            { "id": "2", "tags": [], "owner": null }
        ]);

        let encoded = ReferenceEncoder::new().encode(original.clone());

        assert_eq!(clean_value(encoded), original);
    }

    #[test]
    fn shared_objects_resolve_back_under_resolve_policy() {
        let company = json!({ "id": "c1", "name": "Lotus Labs" });
        let original = json!([
            { "id": "e1", "company": company.clone() },
            { "id": "e2", "company": company }
        ]);

        let encoded = ReferenceEncoder::sharing().encode(original.clone());
        assert_eq!(encoded["$values"][1]["company"]["$ref"], json!("3"));

        let resolved = Normalizer::new(10)
            .with_ref_policy(RefPolicy::Resolve)
            .list(encoded.clone());
        assert_eq!(Value::Array(resolved.items), original);

        let dropped = Normalizer::new(10).list(encoded);
        assert_eq!(dropped.items[1]["company"], json!({}));
    }
}
