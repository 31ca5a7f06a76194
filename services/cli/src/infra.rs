use careerlink::domain::{ExperienceLevel, JobType};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Parses a wire-format enum value such as `full-time` or `entry`.
fn parse_wire<T: DeserializeOwned>(raw: &str, expected: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|_| format!("'{raw}' is not a valid {expected}"))
}

pub(crate) fn parse_job_type(raw: &str) -> Result<JobType, String> {
    parse_wire(raw, "job type (full-time, part-time, internship, contract)")
}

pub(crate) fn parse_experience_level(raw: &str) -> Result<ExperienceLevel, String> {
    parse_wire(raw, "experience level (entry, junior, mid, senior)")
}

pub(crate) fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("'{raw}' must be a positive integer")),
    }
}
