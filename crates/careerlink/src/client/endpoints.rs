use reqwest::Method;

use super::{to_body, ApiClient, ApiError};
use crate::domain::{
    ApplicationDraft, AuthUser, Company, CompanyDraft, CompanyPatch, CvView, CvViewDraft,
    Employer, EmployerDraft, EmployerPatch, ExperienceDraft, Job, JobApplication, JobDraft,
    JobPatch, Skill, SkillDraft, StatusChange, Student, StudentSkillDraft,
};
use crate::normalize::ListPage;
use crate::query::FilterSpec;

impl ApiClient {
    pub async fn list_jobs(&self, filters: &FilterSpec) -> Result<ListPage<Job>, ApiError> {
        self.list("jobs", Some(filters), Some("jobs")).await
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        self.entity(Method::GET, &format!("jobs/{id}"), None).await
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        let body = to_body(&draft.submission())?;
        self.entity(Method::POST, "jobs", body).await
    }

    pub async fn update_job(&self, id: &str, patch: &JobPatch) -> Result<Job, ApiError> {
        self.entity(Method::PUT, &format!("jobs/{id}"), to_body(patch)?)
            .await
    }

    pub async fn delete_job(&self, id: &str) -> Result<String, ApiError> {
        self.command(Method::DELETE, &format!("jobs/{id}")).await
    }

    pub async fn job_applications(&self, job_id: &str) -> Result<ListPage<JobApplication>, ApiError> {
        self.list(&format!("jobs/{job_id}/applications"), None, None)
            .await
    }

    pub async fn employer_jobs(&self, employer_id: &str) -> Result<ListPage<Job>, ApiError> {
        self.list(&format!("employers/{employer_id}/jobs"), None, Some("jobs"))
            .await
    }

    pub async fn apply_to_job(&self, draft: &ApplicationDraft) -> Result<JobApplication, ApiError> {
        self.entity(Method::POST, "applications", to_body(draft)?)
            .await
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        change: &StatusChange,
    ) -> Result<JobApplication, ApiError> {
        self.entity(
            Method::PUT,
            &format!("applications/{id}/status"),
            to_body(change)?,
        )
        .await
    }

    pub async fn student_applications(
        &self,
        student_id: &str,
    ) -> Result<ListPage<JobApplication>, ApiError> {
        self.list(&format!("students/{student_id}/applications"), None, None)
            .await
    }

    pub async fn list_companies(&self, filters: &FilterSpec) -> Result<ListPage<Company>, ApiError> {
        self.list("companies", Some(filters), Some("companies"))
            .await
    }

    pub async fn get_company(&self, id: &str) -> Result<Company, ApiError> {
        self.entity(Method::GET, &format!("companies/{id}"), None)
            .await
    }

    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Company, ApiError> {
        self.entity(Method::POST, "companies", to_body(draft)?).await
    }

    pub async fn update_company(&self, id: &str, patch: &CompanyPatch) -> Result<Company, ApiError> {
        self.entity(Method::PUT, &format!("companies/{id}"), to_body(patch)?)
            .await
    }

    pub async fn delete_company(&self, id: &str) -> Result<String, ApiError> {
        self.command(Method::DELETE, &format!("companies/{id}"))
            .await
    }

    pub async fn toggle_company_verification(&self, id: &str) -> Result<Company, ApiError> {
        self.entity(Method::POST, &format!("companies/{id}/toggle-verification"), None)
            .await
    }

    pub async fn list_employers(&self, filters: &FilterSpec) -> Result<ListPage<Employer>, ApiError> {
        self.list("employers", Some(filters), Some("employers"))
            .await
    }

    pub async fn get_employer(&self, id: &str) -> Result<Employer, ApiError> {
        self.entity(Method::GET, &format!("employers/{id}"), None)
            .await
    }

    pub async fn create_employer(&self, draft: &EmployerDraft) -> Result<Employer, ApiError> {
        self.entity(Method::POST, "employers", to_body(draft)?).await
    }

    pub async fn update_employer(&self, id: &str, patch: &EmployerPatch) -> Result<Employer, ApiError> {
        self.entity(Method::PUT, &format!("employers/{id}"), to_body(patch)?)
            .await
    }

    pub async fn delete_employer(&self, id: &str) -> Result<String, ApiError> {
        self.command(Method::DELETE, &format!("employers/{id}"))
            .await
    }

    pub async fn list_students(&self, filters: &FilterSpec) -> Result<ListPage<Student>, ApiError> {
        self.list("students", Some(filters), Some("students"))
            .await
    }

    pub async fn get_student(&self, id: &str) -> Result<Student, ApiError> {
        self.entity(Method::GET, &format!("students/{id}"), None)
            .await
    }

    pub async fn add_student_skill(
        &self,
        student_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::POST,
            &format!("students/{student_id}/skills"),
            to_body(draft)?,
        )
        .await
    }

    pub async fn update_student_skill(
        &self,
        student_id: &str,
        skill_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::PUT,
            &format!("students/{student_id}/skills/{skill_id}"),
            to_body(draft)?,
        )
        .await
    }

    pub async fn remove_student_skill(
        &self,
        student_id: &str,
        skill_id: &str,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::DELETE,
            &format!("students/{student_id}/skills/{skill_id}"),
            None,
        )
        .await
    }

    pub async fn add_experience(
        &self,
        student_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::POST,
            &format!("students/{student_id}/experiences"),
            to_body(draft)?,
        )
        .await
    }

    pub async fn update_experience(
        &self,
        student_id: &str,
        experience_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::PUT,
            &format!("students/{student_id}/experiences/{experience_id}"),
            to_body(draft)?,
        )
        .await
    }

    pub async fn remove_experience(
        &self,
        student_id: &str,
        experience_id: &str,
    ) -> Result<Student, ApiError> {
        self.entity(
            Method::DELETE,
            &format!("students/{student_id}/experiences/{experience_id}"),
            None,
        )
        .await
    }

    pub async fn record_cv_view(&self, student_id: &str, draft: &CvViewDraft) -> Result<CvView, ApiError> {
        self.entity(
            Method::POST,
            &format!("students/{student_id}/cv-views"),
            to_body(draft)?,
        )
        .await
    }

    pub async fn list_skills(&self) -> Result<ListPage<Skill>, ApiError> {
        self.list("skills", None, None).await
    }

    pub async fn create_skill(&self, draft: &SkillDraft) -> Result<Skill, ApiError> {
        self.entity(Method::POST, "skills", to_body(draft)?).await
    }

    pub async fn cv_views(&self) -> Result<ListPage<CvView>, ApiError> {
        self.list("Admin/cv-views", None, None).await
    }

    /// Confirms the bearer token with the backend and returns its user.
    pub async fn verify_session(&self) -> Result<AuthUser, ApiError> {
        self.entity(Method::GET, "auth/verify", None).await
    }
}
