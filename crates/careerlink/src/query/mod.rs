//! In-memory search used by the mock data layer to stand in for server-side
//! filtering. Filters run first, the total is counted on the filtered set,
//! and only then is the requested page sliced out.

mod filters;

pub use filters::contains_ignore_case;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{CompanySize, ExperienceLevel, JobType};
use crate::normalize::{ListPage, Pagination};

/// Search parameters shared by every list endpoint. Absent fields do not
/// constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default, alias = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<CompanySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_remote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f32>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, alias = "pageSize", skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FilterSpec {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Search term, ignoring blank input.
    pub fn text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Stable key identifying this filter set, used to de-duplicate requests.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Query-string pairs for the REST backend. Skills travel comma-joined.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_string(), value));

        if let Some(text) = self.text() {
            push("query", text.to_string());
        }
        if let Some(location) = &self.location {
            push("location", location.clone());
        }
        if let Some(job_type) = self.job_type {
            push("jobType", wire_name(&job_type));
        }
        if let Some(industry) = &self.industry {
            push("industry", industry.clone());
        }
        if let Some(major) = &self.major {
            push("major", major.clone());
        }
        if let Some(size) = self.company_size {
            push("companySize", size.label().to_string());
        }
        if let Some(verified) = self.is_verified {
            push("isVerified", verified.to_string());
        }
        if let Some(level) = self.experience_level {
            push("experienceLevel", wire_name(&level));
        }
        if let Some(remote) = self.is_remote {
            push("isRemote", remote.to_string());
        }
        if let Some(gpa) = self.gpa {
            push("gpa", gpa.to_string());
        }
        if !self.skills.is_empty() {
            push("skills", self.skills.join(","));
        }
        push("page", self.page().to_string());
        push("limit", self.limit().to_string());
        pairs
    }
}

fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `["a", "b"]` from JSON bodies and `"a,b"` from query strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match raw {
        Some(OneOrMany::One(joined)) => crate::domain::split_list(&joined),
        Some(OneOrMany::Many(entries)) => entries
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        None => Vec::new(),
    })
}

/// Per-entity view used by [`query`].
pub trait Searchable {
    /// Fields probed by the free-text filter.
    fn search_text(&self) -> Vec<&str>;

    /// Names probed by the skills filter.
    fn skill_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn gpa(&self) -> Option<f32> {
        None
    }

    /// Applies the categorical filters this entity carries; the rest are
    /// ignored.
    fn matches_categories(&self, filters: &FilterSpec) -> bool;
}

/// True when `record` satisfies every active predicate.
pub fn matches<T: Searchable>(record: &T, filters: &FilterSpec) -> bool {
    if let Some(text) = filters.text() {
        if !record
            .search_text()
            .into_iter()
            .any(|field| contains_ignore_case(field, text))
        {
            return false;
        }
    }

    if !record.matches_categories(filters) {
        return false;
    }

    if let Some(threshold) = filters.gpa {
        match record.gpa() {
            Some(gpa) if gpa >= threshold => {}
            _ => return false,
        }
    }

    if !filters.skills.is_empty() {
        let names = record.skill_names();
        let overlaps = filters.skills.iter().any(|wanted| {
            names
                .iter()
                .any(|name| contains_ignore_case(name, wanted))
        });
        if !overlaps {
            return false;
        }
    }

    true
}

/// Filters, counts, then pages `collection`.
pub fn query<T: Searchable + Clone>(collection: &[T], filters: &FilterSpec) -> ListPage<T> {
    let matched: Vec<&T> = collection
        .iter()
        .filter(|record| matches(*record, filters))
        .collect();

    let pagination = Pagination::new(filters.page(), filters.limit(), matched.len());
    let start = (pagination.page - 1).saturating_mul(pagination.limit);
    let items = matched
        .into_iter()
        .skip(start)
        .take(pagination.limit)
        .cloned()
        .collect();

    ListPage { items, pagination }
}
