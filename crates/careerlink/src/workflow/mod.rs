//! Employer-driven status changes for job applications.
//!
//! The workflow is deliberately lenient: any status may follow any other, so
//! an employer can reject a pending application outright. The only structural
//! guard is the one the status picker applies, which never offers the current
//! status again.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{ApplicationStatus, JobApplication, StatusChange};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("application is already {0}")]
    Unchanged(ApplicationStatus),
    #[error("application changed since it was loaded (expected {expected}, found {actual})")]
    Stale {
        expected: DateTime<Utc>,
        actual: DateTime<Utc>,
    },
}

/// Statuses offered to the employer for an application currently in `current`.
pub fn transition_choices(current: ApplicationStatus) -> Vec<ApplicationStatus> {
    ApplicationStatus::ordered()
        .into_iter()
        .filter(|status| *status != current)
        .collect()
}

/// Moves `application` to `new_status`.
///
/// `updated_at` becomes `now`; `employer_notes` is replaced only when notes
/// are given; `reviewed_at` becomes `now` for every status except `pending`,
/// which leaves it as it was.
pub fn transition(
    application: &JobApplication,
    new_status: ApplicationStatus,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> JobApplication {
    let mut updated = application.clone();
    updated.status = new_status;
    updated.updated_at = now;
    if notes.is_some() {
        updated.employer_notes = notes;
    }
    if new_status != ApplicationStatus::Pending {
        updated.reviewed_at = Some(now);
    }

    debug!(
        application_id = %application.id,
        from = %application.status,
        to = %new_status,
        "application status transition"
    );
    updated
}

/// Applies a [`StatusChange`] as the store does: any status is accepted, a
/// stale `expected_updated_at` is refused, and a rejection reason is recorded
/// when moving to `rejected`.
pub fn apply_change(
    application: &JobApplication,
    change: &StatusChange,
    now: DateTime<Utc>,
) -> Result<JobApplication, WorkflowError> {
    if let Some(expected) = change.expected_updated_at {
        if expected != application.updated_at {
            return Err(WorkflowError::Stale {
                expected,
                actual: application.updated_at,
            });
        }
    }

    let mut updated = transition(application, change.status, change.notes.clone(), now);
    if change.status == ApplicationStatus::Rejected && change.rejection_reason.is_some() {
        updated.rejection_reason = change.rejection_reason.clone();
    }
    Ok(updated)
}

/// [`apply_change`] behind the picker's guard: re-selecting the current
/// status is refused.
pub fn guarded_transition(
    application: &JobApplication,
    change: &StatusChange,
    now: DateTime<Utc>,
) -> Result<JobApplication, WorkflowError> {
    if change.status == application.status {
        return Err(WorkflowError::Unchanged(application.status));
    }
    apply_change(application, change, now)
}
