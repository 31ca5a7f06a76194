//! Entities exchanged with the CareerLink backend.
//!
//! Field names follow the backend's camelCase JSON. Identifiers are kept as
//! strings even when the backend emits them as numbers.

pub mod application;
pub mod company;
pub mod job;
pub mod skill;
pub mod student;
pub mod user;

pub use application::{ApplicationDraft, ApplicationStatus, JobApplication, StatusChange};
pub use company::{
    Company, CompanyDraft, CompanyPatch, CompanySize, Employer, EmployerDraft, EmployerPatch,
};
pub use job::{
    ExperienceLevel, Job, JobDraft, JobPatch, JobStatus, JobSubmission, JobType, Salary,
    SalaryPeriod,
};
pub use skill::{CvView, CvViewDraft, Skill, SkillDraft};
pub use student::{
    ExperienceDraft, Student, StudentExperience, StudentSkill, StudentSkillDraft,
};
pub use user::{AuthUser, UserRole};

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Splits a comma-delimited form field into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
