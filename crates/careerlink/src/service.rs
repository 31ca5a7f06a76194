//! Entry point used by front ends: every operation goes to the REST backend
//! when one is configured and falls back to the mock store when the backend
//! cannot be reached.

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::{ApiClient, ApiError};
use crate::config::ApiConfig;
use crate::domain::{
    ApplicationDraft, Company, CompanyDraft, CompanyPatch, CvView, CvViewDraft, Employer,
    EmployerDraft, EmployerPatch, ExperienceDraft, Job, JobApplication, JobDraft, JobPatch, Skill,
    SkillDraft, StatusChange, Student, StudentSkillDraft,
};
use crate::mock::{MockStore, StoreError};
use crate::normalize::ListPage;
use crate::query::FilterSpec;
use crate::tracker::RequestTracker;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Short text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api(ApiError::Network(_)) => {
                "Unable to reach the CareerLink server. Please try again later.".to_string()
            }
            ServiceError::Api(ApiError::Decode(_)) => {
                "The server sent a response that could not be read.".to_string()
            }
            ServiceError::Api(ApiError::Rejected(message)) if message.is_empty() => {
                "The request was not accepted.".to_string()
            }
            ServiceError::Store(StoreError::Unavailable) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result of a tracked job search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The response belongs to the newest search and should be shown.
    Applied(ListPage<Job>),
    /// The same filters already completed; nothing was fetched.
    Skipped,
    /// A newer search was issued while this one was in flight.
    Superseded,
}

macro_rules! try_remote {
    ($service:expr, $client:ident => $call:expr) => {
        match &$service.remote {
            Some($client) => Some($call.await),
            None => None,
        }
    };
}

pub struct CareerLinkService {
    remote: Option<ApiClient>,
    store: Arc<MockStore>,
    fallback: bool,
    job_search: RequestTracker,
}

impl CareerLinkService {
    pub fn new(remote: Option<ApiClient>, store: Arc<MockStore>, fallback: bool) -> Self {
        Self {
            remote,
            store,
            fallback,
            job_search: RequestTracker::new(),
        }
    }

    /// Service for the configured backend with a seeded mock store behind it.
    pub fn from_config(config: &ApiConfig) -> Self {
        let remote = ApiClient::from_config(config);
        match &remote {
            Some(client) => info!(
                base_url = client.base_url(),
                fallback = config.fallback_to_mock,
                "using REST backend"
            ),
            None => info!("no backend configured, serving mock data"),
        }
        Self::new(remote, Arc::new(MockStore::seeded()), config.fallback_to_mock)
    }

    pub fn mock_only(store: Arc<MockStore>) -> Self {
        Self::new(None, store, true)
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        if let Some(client) = &mut self.remote {
            client.set_token(token);
        }
    }

    fn settle<T, F>(
        &self,
        operation: &'static str,
        remote: Option<Result<T, ApiError>>,
        local: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce(&MockStore) -> Result<T, StoreError>,
    {
        match remote {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) if err.is_unreachable() && self.fallback => {
                warn!(operation, error = %err, "backend unreachable, serving mock data");
                Ok(local(&self.store)?)
            }
            Some(Err(err)) => Err(err.into()),
            None => Ok(local(&self.store)?),
        }
    }

    /// Runs a job search unless it repeats the last completed one, and reports
    /// whether its result is still the newest.
    pub async fn search_jobs(&self, filters: &FilterSpec) -> Result<SearchOutcome, ServiceError> {
        let Some(ticket) = self.job_search.begin(&filters.cache_key()) else {
            return Ok(SearchOutcome::Skipped);
        };

        match self.list_jobs(filters).await {
            Ok(page) if self.job_search.finish(&ticket) => Ok(SearchOutcome::Applied(page)),
            Ok(_) => Ok(SearchOutcome::Superseded),
            Err(err) => {
                self.job_search.abandon(&ticket);
                Err(err)
            }
        }
    }

    pub async fn list_jobs(&self, filters: &FilterSpec) -> Result<ListPage<Job>, ServiceError> {
        let remote = try_remote!(self, client => client.list_jobs(filters));
        self.settle("list_jobs", remote, |store| store.list_jobs(filters))
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ServiceError> {
        let remote = try_remote!(self, client => client.get_job(id));
        self.settle("get_job", remote, |store| store.get_job(id))
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job, ServiceError> {
        let remote = try_remote!(self, client => client.create_job(draft));
        self.settle("create_job", remote, |store| store.create_job(draft))
    }

    pub async fn update_job(&self, id: &str, patch: &JobPatch) -> Result<Job, ServiceError> {
        let remote = try_remote!(self, client => client.update_job(id, patch));
        self.settle("update_job", remote, |store| store.update_job(id, patch))
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ServiceError> {
        let remote = try_remote!(self, client => client.delete_job(id)).map(|r| r.map(drop));
        self.settle("delete_job", remote, |store| store.delete_job(id))
    }

    pub async fn job_applications(
        &self,
        job_id: &str,
    ) -> Result<ListPage<JobApplication>, ServiceError> {
        let remote = try_remote!(self, client => client.job_applications(job_id));
        self.settle("job_applications", remote, |store| {
            store.job_applications(job_id)
        })
    }

    pub async fn employer_jobs(&self, employer_id: &str) -> Result<ListPage<Job>, ServiceError> {
        let remote = try_remote!(self, client => client.employer_jobs(employer_id));
        self.settle("employer_jobs", remote, |store| store.employer_jobs(employer_id))
    }

    pub async fn apply_to_job(
        &self,
        draft: &ApplicationDraft,
    ) -> Result<JobApplication, ServiceError> {
        let remote = try_remote!(self, client => client.apply_to_job(draft));
        self.settle("apply_to_job", remote, |store| store.apply_to_job(draft))
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        change: &StatusChange,
    ) -> Result<JobApplication, ServiceError> {
        let remote = try_remote!(self, client => client.update_application_status(id, change));
        self.settle("update_application_status", remote, |store| {
            store.update_application_status(id, change)
        })
    }

    pub async fn student_applications(
        &self,
        student_id: &str,
    ) -> Result<ListPage<JobApplication>, ServiceError> {
        let remote = try_remote!(self, client => client.student_applications(student_id));
        self.settle("student_applications", remote, |store| {
            store.student_applications(student_id)
        })
    }

    pub async fn list_companies(
        &self,
        filters: &FilterSpec,
    ) -> Result<ListPage<Company>, ServiceError> {
        let remote = try_remote!(self, client => client.list_companies(filters));
        self.settle("list_companies", remote, |store| store.list_companies(filters))
    }

    pub async fn get_company(&self, id: &str) -> Result<Company, ServiceError> {
        let remote = try_remote!(self, client => client.get_company(id));
        self.settle("get_company", remote, |store| store.get_company(id))
    }

    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Company, ServiceError> {
        let remote = try_remote!(self, client => client.create_company(draft));
        self.settle("create_company", remote, |store| store.create_company(draft))
    }

    pub async fn update_company(
        &self,
        id: &str,
        patch: &CompanyPatch,
    ) -> Result<Company, ServiceError> {
        let remote = try_remote!(self, client => client.update_company(id, patch));
        self.settle("update_company", remote, |store| store.update_company(id, patch))
    }

    pub async fn delete_company(&self, id: &str) -> Result<(), ServiceError> {
        let remote = try_remote!(self, client => client.delete_company(id)).map(|r| r.map(drop));
        self.settle("delete_company", remote, |store| store.delete_company(id))
    }

    pub async fn toggle_company_verification(&self, id: &str) -> Result<Company, ServiceError> {
        let remote = try_remote!(self, client => client.toggle_company_verification(id));
        self.settle("toggle_company_verification", remote, |store| {
            store.toggle_company_verification(id)
        })
    }

    pub async fn list_employers(
        &self,
        filters: &FilterSpec,
    ) -> Result<ListPage<Employer>, ServiceError> {
        let remote = try_remote!(self, client => client.list_employers(filters));
        self.settle("list_employers", remote, |store| store.list_employers(filters))
    }

    pub async fn get_employer(&self, id: &str) -> Result<Employer, ServiceError> {
        let remote = try_remote!(self, client => client.get_employer(id));
        self.settle("get_employer", remote, |store| store.get_employer(id))
    }

    pub async fn create_employer(&self, draft: &EmployerDraft) -> Result<Employer, ServiceError> {
        let remote = try_remote!(self, client => client.create_employer(draft));
        self.settle("create_employer", remote, |store| store.create_employer(draft))
    }

    pub async fn update_employer(
        &self,
        id: &str,
        patch: &EmployerPatch,
    ) -> Result<Employer, ServiceError> {
        let remote = try_remote!(self, client => client.update_employer(id, patch));
        self.settle("update_employer", remote, |store| store.update_employer(id, patch))
    }

    pub async fn delete_employer(&self, id: &str) -> Result<(), ServiceError> {
        let remote = try_remote!(self, client => client.delete_employer(id)).map(|r| r.map(drop));
        self.settle("delete_employer", remote, |store| store.delete_employer(id))
    }

    pub async fn list_students(
        &self,
        filters: &FilterSpec,
    ) -> Result<ListPage<Student>, ServiceError> {
        let remote = try_remote!(self, client => client.list_students(filters));
        self.settle("list_students", remote, |store| store.list_students(filters))
    }

    pub async fn get_student(&self, id: &str) -> Result<Student, ServiceError> {
        let remote = try_remote!(self, client => client.get_student(id));
        self.settle("get_student", remote, |store| store.get_student(id))
    }

    pub async fn add_student_skill(
        &self,
        student_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, ServiceError> {
        let remote = try_remote!(self, client => client.add_student_skill(student_id, draft));
        self.settle("add_student_skill", remote, |store| {
            store.add_student_skill(student_id, draft)
        })
    }

    pub async fn update_student_skill(
        &self,
        student_id: &str,
        skill_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, ServiceError> {
        let remote =
            try_remote!(self, client => client.update_student_skill(student_id, skill_id, draft));
        self.settle("update_student_skill", remote, |store| {
            store.update_student_skill(student_id, skill_id, draft)
        })
    }

    pub async fn remove_student_skill(
        &self,
        student_id: &str,
        skill_id: &str,
    ) -> Result<Student, ServiceError> {
        let remote = try_remote!(self, client => client.remove_student_skill(student_id, skill_id));
        self.settle("remove_student_skill", remote, |store| {
            store.remove_student_skill(student_id, skill_id)
        })
    }

    pub async fn add_experience(
        &self,
        student_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, ServiceError> {
        let remote = try_remote!(self, client => client.add_experience(student_id, draft));
        self.settle("add_experience", remote, |store| {
            store.add_experience(student_id, draft)
        })
    }

    pub async fn update_experience(
        &self,
        student_id: &str,
        experience_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, ServiceError> {
        let remote = try_remote!(
            self,
            client => client.update_experience(student_id, experience_id, draft)
        );
        self.settle("update_experience", remote, |store| {
            store.update_experience(student_id, experience_id, draft)
        })
    }

    pub async fn remove_experience(
        &self,
        student_id: &str,
        experience_id: &str,
    ) -> Result<Student, ServiceError> {
        let remote =
            try_remote!(self, client => client.remove_experience(student_id, experience_id));
        self.settle("remove_experience", remote, |store| {
            store.remove_experience(student_id, experience_id)
        })
    }

    pub async fn record_cv_view(
        &self,
        student_id: &str,
        draft: &CvViewDraft,
    ) -> Result<CvView, ServiceError> {
        let remote = try_remote!(self, client => client.record_cv_view(student_id, draft));
        self.settle("record_cv_view", remote, |store| {
            store.record_cv_view(student_id, draft)
        })
    }

    pub async fn cv_views(&self) -> Result<ListPage<CvView>, ServiceError> {
        let remote = try_remote!(self, client => client.cv_views());
        self.settle("cv_views", remote, MockStore::cv_views)
    }

    pub async fn list_skills(&self) -> Result<ListPage<Skill>, ServiceError> {
        let remote = try_remote!(self, client => client.list_skills());
        self.settle("list_skills", remote, MockStore::list_skills)
    }

    pub async fn create_skill(&self, draft: &SkillDraft) -> Result<Skill, ServiceError> {
        let remote = try_remote!(self, client => client.create_skill(draft));
        self.settle("create_skill", remote, |store| store.create_skill(draft))
    }
}
