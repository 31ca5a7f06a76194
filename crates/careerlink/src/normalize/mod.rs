//! Adapts the backend's inconsistent list and entity payloads into one shape.
//!
//! List endpoints answer with plain arrays, `{ items, pagination }`, .NET
//! reference-preserving `{ $values }` wrappers (bare or under a named key),
//! or the legacy `{ pagination, data }` form, optionally inside a
//! `{ success, message, data }` envelope. [`Normalizer::list`] turns all of
//! them into a [`ListPage`] and strips `$id`/`$ref`/`$values` artifacts from
//! every retained item. Normalization never fails: unrecognized input yields
//! an empty page and a warning.

mod clean;
mod envelope;
mod shape;

pub use clean::{clean_value, is_clean, RefPolicy};
pub use envelope::{Envelope, PaginatedEnvelope};
pub use shape::{classify, ResponseShape};

use clean::Cleaner;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Builds a consistent pagination block. `page` and `limit` are clamped
    /// to at least one.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }

    /// First page of an empty collection.
    pub fn empty(limit: usize) -> Self {
        Self::new(1, limit, 0)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> ListPage<T> {
    pub fn empty(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::empty(limit),
        }
    }

    pub fn map<U, F>(self, f: F) -> ListPage<U>
    where
        F: FnMut(T) -> U,
    {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Configured normalization pass.
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_page_size: usize,
    ref_policy: RefPolicy,
    collection_key: Option<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Normalizer {
    pub fn new(default_page_size: usize) -> Self {
        Self {
            default_page_size: default_page_size.max(1),
            ref_policy: RefPolicy::Drop,
            collection_key: None,
        }
    }

    pub fn with_ref_policy(mut self, policy: RefPolicy) -> Self {
        self.ref_policy = policy;
        self
    }

    /// Names the sub-key expected to hold `{ $values }` in collection responses.
    pub fn with_collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = Some(key.into());
        self
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn list(&self, raw: Value) -> ListPage<Value> {
        let shape = classify(raw, self.collection_key.as_deref());
        let shape_name = shape.name();
        let mut cleaner = Cleaner::new(self.ref_policy);

        let (items, source) = match shape {
            ResponseShape::Paged { items, pagination } => {
                (into_items(cleaner.clean(items)), pagination)
            }
            ResponseShape::Collection { items, meta, .. } => {
                (into_items(cleaner.clean(items)), Some(meta))
            }
            ResponseShape::Legacy { items, pagination } => {
                (into_items(cleaner.clean(items)), Some(pagination))
            }
            ResponseShape::Values { items } | ResponseShape::Bare { items } => {
                (into_items(cleaner.clean(items)), None)
            }
            ResponseShape::Unrecognized => {
                warn!("unrecognized list response shape, returning empty page");
                return ListPage::empty(self.default_page_size);
            }
        };

        let pagination = match source {
            Some(fields) => self.pagination_from(&fields, items.len()),
            None => Pagination::new(1, self.default_page_size, items.len()),
        };

        trace!(shape = shape_name, count = items.len(), "normalized list response");
        ListPage { items, pagination }
    }

    /// Like [`Normalizer::list`], deserializing each item. Items that do not
    /// match `T` are skipped with a warning; pagination is left as reported.
    pub fn list_as<T: DeserializeOwned>(&self, raw: Value) -> ListPage<T> {
        let page = self.list(raw);
        let items = page
            .items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(index, error = %err, "skipping list item that does not match the expected type");
                    None
                }
            })
            .collect();

        ListPage {
            items,
            pagination: page.pagination,
        }
    }

    pub fn entity(&self, raw: Value) -> Value {
        Cleaner::new(self.ref_policy).clean(raw)
    }

    pub fn entity_as<T: DeserializeOwned>(&self, raw: Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.entity(raw))
    }

    fn pagination_from(&self, fields: &Map<String, Value>, item_count: usize) -> Pagination {
        let page = read_count(fields, &["page", "pageNumber", "currentPage"]).unwrap_or(1);
        let limit = read_count(fields, &["pageSize", "limit"])
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_page_size);
        let total = read_count(fields, &["total", "totalCount", "totalItems"]).unwrap_or(item_count);
        let computed = Pagination::new(page, limit, total);

        match read_count(fields, &["totalPages"]) {
            Some(total_pages) => Pagination {
                total_pages,
                ..computed
            },
            None => computed,
        }
    }
}

fn into_items(cleaned: Value) -> Vec<Value> {
    match cleaned {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Reads the first key that holds a non-negative integer, accepting numeric
/// strings as some endpoints send them.
fn read_count(fields: &Map<String, Value>, keys: &[&str]) -> Option<usize> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::Number(number) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Normalizes a list response with default settings.
pub fn normalize_list(raw: Value, default_page_size: usize) -> ListPage<Value> {
    Normalizer::new(default_page_size).list(raw)
}

/// Cleans a single-resource response.
pub fn normalize_entity(raw: Value) -> Value {
    clean_value(raw)
}

pub fn normalize_list_as<T: DeserializeOwned>(raw: Value, default_page_size: usize) -> ListPage<T> {
    Normalizer::new(default_page_size).list_as(raw)
}

pub fn normalize_entity_as<T: DeserializeOwned>(raw: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(normalize_entity(raw))
}
