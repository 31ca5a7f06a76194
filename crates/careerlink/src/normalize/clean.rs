use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

pub(crate) const ID_KEY: &str = "$id";
pub(crate) const REF_KEY: &str = "$ref";
pub(crate) const VALUES_KEY: &str = "$values";

/// How `$ref` back-references are treated while cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefPolicy {
    /// Discard the reference. The node keeps its remaining keys, which for a
    /// pure reference leaves an empty object behind.
    #[default]
    Drop,
    /// Replace the node with a copy of the already-cleaned object that carried
    /// the matching `$id`. References to an ancestor (cycles) and forward
    /// references cannot be resolved and degrade to `Drop`.
    Resolve,
}

/// Single-pass cleaner. One instance should span one response so `Resolve`
/// can see every `$id` emitted before a reference.
pub(crate) struct Cleaner {
    policy: RefPolicy,
    seen: HashMap<String, Value>,
}

impl Cleaner {
    pub(crate) fn new(policy: RefPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    pub(crate) fn clean(&mut self, value: Value) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.clean(item)).collect())
            }
            Value::Object(map) => self.clean_object(map),
            other => other,
        }
    }

    fn clean_object(&mut self, mut map: Map<String, Value>) -> Value {
        let id = map.remove(ID_KEY).and_then(tag_of);
        let reference = map.remove(REF_KEY).and_then(tag_of);

        if let Some(reference) = reference {
            if self.policy == RefPolicy::Resolve {
                if let Some(target) = self.seen.get(&reference) {
                    return target.clone();
                }
                debug!(reference = %reference, "unresolved $ref, dropping");
            }
        }

        let cleaned = match map.remove(VALUES_KEY) {
            Some(values @ Value::Array(_)) => self.clean(values),
            _ => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, self.clean(value)))
                    .collect(),
            ),
        };

        if let (RefPolicy::Resolve, Some(id)) = (self.policy, id) {
            self.seen.insert(id, cleaned.clone());
        }

        cleaned
    }
}

fn tag_of(value: Value) -> Option<String> {
    match value {
        Value::String(tag) => Some(tag),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Strips reference-tracking artifacts from any JSON value, dropping `$ref`.
pub fn clean_value(value: Value) -> Value {
    Cleaner::new(RefPolicy::Drop).clean(value)
}

/// True when no object at any depth carries `$id`, `$ref` or `$values`.
pub fn is_clean(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_clean),
        Value::Object(map) => {
            !map.contains_key(ID_KEY)
                && !map.contains_key(REF_KEY)
                && !map.contains_key(VALUES_KEY)
                && map.values().all(is_clean)
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_identity_tags_at_every_depth() {
        let raw = json!({
            "$id": "1",
            "name": "Acme",
            "owner": { "$id": "2", "name": "Lan", "tags": ["a", { "$id": "3", "x": 1 }] }
        });

        let cleaned = clean_value(raw);

        assert_eq!(
            cleaned,
            json!({ "name": "Acme", "owner": { "name": "Lan", "tags": ["a", { "x": 1 }] } })
        );
    }

    #[test]
    fn values_wrapper_is_substituted_by_its_array() {
        let raw = json!({
            "skills": { "$id": "4", "$values": [ { "$id": "5", "name": "Rust" } ] }
        });

        assert_eq!(clean_value(raw), json!({ "skills": [ { "name": "Rust" } ] }));
    }

    #[test]
    fn non_array_values_key_is_discarded() {
        let raw = json!({ "$values": null, "name": "x" });
        assert_eq!(clean_value(raw), json!({ "name": "x" }));
    }

    #[test]
    fn drop_policy_leaves_empty_stand_in_for_references() {
        let raw = json!([
            { "$id": "1", "company": { "$id": "2", "name": "Acme" } },
            { "$id": "3", "company": { "$ref": "2" } }
        ]);

        let cleaned = clean_value(raw);

        assert_eq!(cleaned[1]["company"], json!({}));
        assert!(is_clean(&cleaned));
    }

    #[test]
    fn resolve_policy_reuses_cleaned_referent() {
        let raw = json!([
            { "$id": "1", "company": { "$id": "2", "name": "Acme", "tags": { "$values": ["it"] } } },
            { "$id": "3", "company": { "$ref": "2" } }
        ]);

        let cleaned = Cleaner::new(RefPolicy::Resolve).clean(raw);

        assert_eq!(cleaned[1]["company"], json!({ "name": "Acme", "tags": ["it"] }));
        assert_eq!(cleaned[0]["company"], cleaned[1]["company"]);
    }

    #[test]
    fn resolve_policy_cannot_rebuild_cycles() {
        let raw = json!({ "$id": "1", "name": "root", "self": { "$ref": "1" } });

        let cleaned = Cleaner::new(RefPolicy::Resolve).clean(raw);

        assert_eq!(cleaned, json!({ "name": "root", "self": {} }));
    }

    #[test]
    fn cleaning_is_a_fixed_point() {
        let raw = json!({
            "$id": "1",
            "data": { "$values": [ { "$id": "2", "n": { "$ref": "9" } }, 3, "s", null ] }
        });

        let once = clean_value(raw);
        let twice = clean_value(once.clone());

        assert_eq!(once, twice);
    }
}
