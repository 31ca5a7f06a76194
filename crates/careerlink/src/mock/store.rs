use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use super::seed;
use super::StoreError;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{
    ApplicationDraft, AuthUser, Company, CompanyDraft, CompanyPatch, CvView, CvViewDraft,
    Employer, EmployerDraft, EmployerPatch, ExperienceDraft, Job, JobApplication, JobDraft,
    JobPatch, JobSubmission, Skill, SkillDraft, StatusChange, Student, StudentSkillDraft,
};
use crate::normalize::{ListPage, Pagination};
use crate::query::{query, FilterSpec};
use crate::workflow::{self, WorkflowError};

/// Rows held by the mock backend.
#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) jobs: Vec<Job>,
    pub(super) applications: Vec<JobApplication>,
    pub(super) companies: Vec<Company>,
    pub(super) employers: Vec<Employer>,
    pub(super) students: Vec<Student>,
    pub(super) skills: Vec<Skill>,
    pub(super) cv_views: Vec<CvView>,
    pub(super) users: Vec<AuthUser>,
}

/// Mutex-guarded in-memory tables. Mutations edit rows in place; the lock is
/// never held across an await.
#[derive(Debug)]
pub struct MockStore {
    tables: Mutex<Tables>,
    next_id: AtomicU64,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::empty()
    }
}

const FIRST_GENERATED_ID: u64 = 1000;

impl MockStore {
    pub fn empty() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            next_id: AtomicU64::new(FIRST_GENERATED_ID),
        }
    }

    /// Store preloaded with the sample companies, jobs and students.
    pub fn seeded() -> Self {
        Self {
            tables: Mutex::new(seed::sample_tables(Utc::now())),
            next_id: AtomicU64::new(FIRST_GENERATED_ID),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Unavailable)
    }

    fn next_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    // Jobs

    pub fn list_jobs(&self, filters: &FilterSpec) -> Result<ListPage<Job>, StoreError> {
        let tables = self.tables()?;
        Ok(query(&tables.jobs, filters))
    }

    /// Returns the job and counts the view.
    pub fn get_job(&self, id: &str) -> Result<Job, StoreError> {
        let mut tables = self.tables()?;
        let job = find_mut(&mut tables.jobs, "Job", id, |job| &job.id)?;
        job.view_count += 1;
        Ok(job.clone())
    }

    pub fn create_job(&self, draft: &JobDraft) -> Result<Job, StoreError> {
        self.submit_job(draft.submission())
    }

    /// Creates a job from the payload the client posts. The company is the
    /// posting employer's.
    pub fn submit_job(&self, submission: JobSubmission) -> Result<Job, StoreError> {
        if submission.title.is_empty() {
            return Err(StoreError::Validation("Job title is required".to_string()));
        }

        let mut tables = self.tables()?;
        let employer = find(&tables.employers, "Employer", &submission.employer_id, |e| &e.id)?;
        let company_id = employer.company_id.clone();
        let company = tables
            .companies
            .iter()
            .find(|company| company.id == company_id)
            .map(|company| company.name.clone())
            .unwrap_or_else(|| employer.company.name.clone());

        let job = Job {
            id: self.next_id(),
            title: submission.title,
            company,
            company_id,
            description: submission.description,
            requirements: submission.requirements,
            responsibilities: submission.responsibilities,
            salary: submission.salary,
            location: submission.location,
            job_type: submission.job_type,
            experience_level: submission.experience_level,
            skills: submission.skills,
            posted_date: Utc::now(),
            application_deadline: submission.application_deadline,
            status: submission.status,
            employer_id: submission.employer_id,
            view_count: 0,
            application_count: 0,
            is_remote: submission.is_remote,
        };
        info!(job_id = %job.id, employer_id = %job.employer_id, "job created");
        tables.jobs.push(job.clone());
        Ok(job)
    }

    pub fn update_job(&self, id: &str, patch: &JobPatch) -> Result<Job, StoreError> {
        let mut tables = self.tables()?;
        let job = find_mut(&mut tables.jobs, "Job", id, |job| &job.id)?;
        patch.apply_to(job);
        debug!(job_id = %id, "job updated");
        Ok(job.clone())
    }

    pub fn delete_job(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        remove(&mut tables.jobs, "Job", id, |job| &job.id)?;
        let before = tables.applications.len();
        tables.applications.retain(|application| application.job_id != id);
        info!(
            job_id = %id,
            removed_applications = before - tables.applications.len(),
            "job deleted"
        );
        Ok(())
    }

    pub fn job_applications(&self, job_id: &str) -> Result<ListPage<JobApplication>, StoreError> {
        let tables = self.tables()?;
        find(&tables.jobs, "Job", job_id, |job| &job.id)?;
        Ok(whole(
            tables
                .applications
                .iter()
                .filter(|application| application.job_id == job_id)
                .cloned()
                .collect(),
        ))
    }

    pub fn employer_jobs(&self, employer_id: &str) -> Result<ListPage<Job>, StoreError> {
        let tables = self.tables()?;
        find(&tables.employers, "Employer", employer_id, |e| &e.id)?;
        Ok(whole(
            tables
                .jobs
                .iter()
                .filter(|job| job.employer_id == employer_id)
                .cloned()
                .collect(),
        ))
    }

    // Applications

    /// Files an application. A student may apply to a job only once.
    pub fn apply_to_job(&self, draft: &ApplicationDraft) -> Result<JobApplication, StoreError> {
        let mut tables = self.tables()?;

        let duplicate = tables
            .applications
            .iter()
            .any(|existing| existing.job_id == draft.job_id && existing.student_id == draft.student_id);
        if duplicate {
            return Err(StoreError::AlreadyApplied {
                job_id: draft.job_id.clone(),
                student_id: draft.student_id.clone(),
            });
        }
        find(&tables.students, "Student", &draft.student_id, |s| &s.id)?;
        let job = find_mut(&mut tables.jobs, "Job", &draft.job_id, |job| &job.id)?;
        job.application_count += 1;

        let now = Utc::now();
        let application = JobApplication {
            id: self.next_id(),
            job_id: draft.job_id.clone(),
            student_id: draft.student_id.clone(),
            cover_letter: draft.cover_letter.clone(),
            resume_url: draft.resume_url.clone(),
            status: Default::default(),
            applied_at: now,
            updated_at: now,
            reviewed_at: None,
            employer_notes: None,
            rejection_reason: None,
        };
        info!(
            application_id = %application.id,
            job_id = %application.job_id,
            student_id = %application.student_id,
            "application submitted"
        );
        tables.applications.push(application.clone());
        Ok(application)
    }

    pub fn update_application_status(
        &self,
        id: &str,
        change: &StatusChange,
    ) -> Result<JobApplication, StoreError> {
        let mut tables = self.tables()?;
        let application = find_mut(&mut tables.applications, "Application", id, |a| &a.id)?;
        let updated = workflow::apply_change(application, change, Utc::now())?;
        *application = updated.clone();
        Ok(updated)
    }

    pub fn student_applications(
        &self,
        student_id: &str,
    ) -> Result<ListPage<JobApplication>, StoreError> {
        let tables = self.tables()?;
        find(&tables.students, "Student", student_id, |s| &s.id)?;
        Ok(whole(
            tables
                .applications
                .iter()
                .filter(|application| application.student_id == student_id)
                .cloned()
                .collect(),
        ))
    }

    // Companies

    pub fn list_companies(&self, filters: &FilterSpec) -> Result<ListPage<Company>, StoreError> {
        let tables = self.tables()?;
        Ok(query(&tables.companies, filters))
    }

    pub fn get_company(&self, id: &str) -> Result<Company, StoreError> {
        let tables = self.tables()?;
        find(&tables.companies, "Company", id, |c| &c.id).cloned()
    }

    pub fn create_company(&self, draft: &CompanyDraft) -> Result<Company, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("Company name is required".to_string()));
        }
        let company = draft.clone().into_company(self.next_id(), Utc::now());
        let mut tables = self.tables()?;
        info!(company_id = %company.id, name = %company.name, "company created");
        tables.companies.push(company.clone());
        Ok(company)
    }

    pub fn update_company(&self, id: &str, patch: &CompanyPatch) -> Result<Company, StoreError> {
        let mut tables = self.tables()?;
        let company = find_mut(&mut tables.companies, "Company", id, |c| &c.id)?;
        patch.apply_to(company);
        company.updated_at = Utc::now();
        let company = company.clone();
        refresh_company_copies(&mut tables, &company);
        Ok(company)
    }

    pub fn delete_company(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.employers.iter().any(|employer| employer.company_id == id) {
            return Err(StoreError::Conflict(
                "Company still has employers".to_string(),
            ));
        }
        remove(&mut tables.companies, "Company", id, |c| &c.id)?;
        info!(company_id = %id, "company deleted");
        Ok(())
    }

    pub fn toggle_company_verification(&self, id: &str) -> Result<Company, StoreError> {
        let mut tables = self.tables()?;
        let company = find_mut(&mut tables.companies, "Company", id, |c| &c.id)?;
        company.is_verified = !company.is_verified;
        company.updated_at = Utc::now();
        let company = company.clone();
        info!(company_id = %id, verified = company.is_verified, "company verification toggled");
        refresh_company_copies(&mut tables, &company);
        Ok(company)
    }

    // Employers

    pub fn list_employers(&self, filters: &FilterSpec) -> Result<ListPage<Employer>, StoreError> {
        let tables = self.tables()?;
        Ok(query(&tables.employers, filters))
    }

    pub fn get_employer(&self, id: &str) -> Result<Employer, StoreError> {
        let tables = self.tables()?;
        find(&tables.employers, "Employer", id, |e| &e.id).cloned()
    }

    pub fn create_employer(&self, draft: &EmployerDraft) -> Result<Employer, StoreError> {
        if draft.full_name.trim().is_empty() || draft.email.trim().is_empty() {
            return Err(StoreError::Validation(
                "Employer name and email are required".to_string(),
            ));
        }

        let mut tables = self.tables()?;
        let company = find(&tables.companies, "Company", &draft.company_id, |c| &c.id)?.clone();
        let now = Utc::now();
        let employer = Employer {
            id: self.next_id(),
            user_id: draft.user_id.clone(),
            company_id: company.id.clone(),
            full_name: draft.full_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            position: draft.position.clone(),
            phone: draft.phone.clone(),
            company,
            created_by: draft.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        info!(employer_id = %employer.id, company_id = %employer.company_id, "employer created");
        tables.employers.push(employer.clone());
        Ok(employer)
    }

    pub fn update_employer(&self, id: &str, patch: &EmployerPatch) -> Result<Employer, StoreError> {
        let mut tables = self.tables()?;
        let company = match &patch.company_id {
            Some(company_id) => {
                Some(find(&tables.companies, "Company", company_id, |c| &c.id)?.clone())
            }
            None => None,
        };

        let employer = find_mut(&mut tables.employers, "Employer", id, |e| &e.id)?;
        if let Some(full_name) = &patch.full_name {
            employer.full_name = full_name.clone();
        }
        if let Some(email) = &patch.email {
            employer.email = email.clone();
        }
        if patch.position.is_some() {
            employer.position = patch.position.clone();
        }
        if patch.phone.is_some() {
            employer.phone = patch.phone.clone();
        }
        if let Some(company) = company {
            employer.company_id = company.id.clone();
            employer.company = company;
        }
        employer.updated_at = Utc::now();
        Ok(employer.clone())
    }

    pub fn delete_employer(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        remove(&mut tables.employers, "Employer", id, |e| &e.id)?;
        info!(employer_id = %id, "employer deleted");
        Ok(())
    }

    // Students

    pub fn list_students(&self, filters: &FilterSpec) -> Result<ListPage<Student>, StoreError> {
        let tables = self.tables()?;
        Ok(query(&tables.students, filters))
    }

    pub fn get_student(&self, id: &str) -> Result<Student, StoreError> {
        let tables = self.tables()?;
        find(&tables.students, "Student", id, |s| &s.id).cloned()
    }

    pub fn add_student_skill(
        &self,
        student_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("Skill name is required".to_string()));
        }
        let skill = draft.clone().into_skill(self.next_id());
        self.edit_student(student_id, |student| {
            student.skills.push(skill);
            Ok(())
        })
    }

    pub fn update_student_skill(
        &self,
        student_id: &str,
        skill_id: &str,
        draft: &StudentSkillDraft,
    ) -> Result<Student, StoreError> {
        self.edit_student(student_id, |student| {
            let skill = find_mut(&mut student.skills, "Skill", skill_id, |s| &s.id)?;
            *skill = draft.clone().into_skill(skill_id.to_string());
            Ok(())
        })
    }

    pub fn remove_student_skill(&self, student_id: &str, skill_id: &str) -> Result<Student, StoreError> {
        self.edit_student(student_id, |student| {
            remove(&mut student.skills, "Skill", skill_id, |s| &s.id).map(drop)
        })
    }

    pub fn add_experience(
        &self,
        student_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, StoreError> {
        validate_dates(draft)?;
        let experience = draft.clone().into_experience(self.next_id());
        self.edit_student(student_id, |student| {
            student.experiences.push(experience);
            Ok(())
        })
    }

    pub fn update_experience(
        &self,
        student_id: &str,
        experience_id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Student, StoreError> {
        validate_dates(draft)?;
        self.edit_student(student_id, |student| {
            let experience =
                find_mut(&mut student.experiences, "Experience", experience_id, |e| &e.id)?;
            *experience = draft.clone().into_experience(experience_id.to_string());
            Ok(())
        })
    }

    pub fn remove_experience(
        &self,
        student_id: &str,
        experience_id: &str,
    ) -> Result<Student, StoreError> {
        self.edit_student(student_id, |student| {
            remove(&mut student.experiences, "Experience", experience_id, |e| &e.id).map(drop)
        })
    }

    fn edit_student<F>(&self, student_id: &str, edit: F) -> Result<Student, StoreError>
    where
        F: FnOnce(&mut Student) -> Result<(), StoreError>,
    {
        let mut tables = self.tables()?;
        let student = find_mut(&mut tables.students, "Student", student_id, |s| &s.id)?;
        edit(student)?;
        debug!(student_id = %student_id, "student profile updated");
        Ok(student.clone())
    }

    pub fn record_cv_view(&self, student_id: &str, draft: &CvViewDraft) -> Result<CvView, StoreError> {
        let mut tables = self.tables()?;
        find(&tables.students, "Student", student_id, |s| &s.id)?;
        find(&tables.employers, "Employer", &draft.employer_id, |e| &e.id)?;
        let view = CvView {
            id: self.next_id(),
            student_id: student_id.to_string(),
            employer_id: draft.employer_id.clone(),
            viewed_at: Utc::now(),
        };
        tables.cv_views.push(view.clone());
        Ok(view)
    }

    pub fn cv_views(&self) -> Result<ListPage<CvView>, StoreError> {
        let tables = self.tables()?;
        Ok(whole(tables.cv_views.clone()))
    }

    // Skills catalogue

    pub fn list_skills(&self) -> Result<ListPage<Skill>, StoreError> {
        let tables = self.tables()?;
        Ok(whole(tables.skills.clone()))
    }

    pub fn create_skill(&self, draft: &SkillDraft) -> Result<Skill, StoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("Skill name is required".to_string()));
        }

        let mut tables = self.tables()?;
        if tables
            .skills
            .iter()
            .any(|skill| skill.name.to_lowercase() == name.to_lowercase())
        {
            return Err(StoreError::Duplicate {
                entity: "Skill",
                name: name.to_string(),
            });
        }
        let skill = Skill {
            id: self.next_id(),
            name: name.to_string(),
            category: draft.category.clone(),
        };
        tables.skills.push(skill.clone());
        Ok(skill)
    }

    // Sessions

    /// Looks up the user a bearer token belongs to.
    pub fn user_for_token(&self, token: &str) -> Result<Option<AuthUser>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .iter()
            .find(|user| user.token.as_deref() == Some(token))
            .cloned())
    }

    /// Inserts or replaces a user row, keyed by id.
    pub fn register_user(&self, user: AuthUser) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.users.retain(|existing| existing.id != user.id);
        tables.users.push(user);
        Ok(())
    }
}

impl From<WorkflowError> for StoreError {
    fn from(err: WorkflowError) -> Self {
        StoreError::Conflict(err.to_string())
    }
}

fn find<'a, T>(
    rows: &'a [T],
    entity: &'static str,
    id: &str,
    key: impl Fn(&T) -> &String,
) -> Result<&'a T, StoreError> {
    rows.iter()
        .find(|row| key(row) == id)
        .ok_or_else(|| StoreError::not_found(entity, id))
}

fn find_mut<'a, T>(
    rows: &'a mut [T],
    entity: &'static str,
    id: &str,
    key: impl Fn(&T) -> &String,
) -> Result<&'a mut T, StoreError> {
    rows.iter_mut()
        .find(|row| key(row) == id)
        .ok_or_else(|| StoreError::not_found(entity, id))
}

fn remove<T>(
    rows: &mut Vec<T>,
    entity: &'static str,
    id: &str,
    key: impl Fn(&T) -> &String,
) -> Result<T, StoreError> {
    let index = rows
        .iter()
        .position(|row| key(row) == id)
        .ok_or_else(|| StoreError::not_found(entity, id))?;
    Ok(rows.remove(index))
}

/// Whole-collection page, paginated the way an unpaged backend list
/// normalizes.
fn whole<T>(items: Vec<T>) -> ListPage<T> {
    let pagination = Pagination::new(1, DEFAULT_PAGE_SIZE, items.len());
    ListPage { items, pagination }
}

fn refresh_company_copies(tables: &mut Tables, company: &Company) {
    for employer in tables
        .employers
        .iter_mut()
        .filter(|employer| employer.company_id == company.id)
    {
        employer.company = company.clone();
    }
    for job in tables
        .jobs
        .iter_mut()
        .filter(|job| job.company_id == company.id)
    {
        job.company = company.name.clone();
    }
}

fn validate_dates(draft: &ExperienceDraft) -> Result<(), StoreError> {
    match draft.end_date {
        Some(end) if end < draft.start_date => Err(StoreError::Validation(
            "Experience cannot end before it starts".to_string(),
        )),
        _ => Ok(()),
    }
}
