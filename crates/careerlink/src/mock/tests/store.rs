use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::domain::{
    ApplicationStatus, CompanyPatch, ExperienceDraft, JobType, SkillDraft, StatusChange,
    StudentSkillDraft,
};
use crate::mock::{MockStore, StoreError};
use crate::query::FilterSpec;

#[test]
fn second_application_to_the_same_job_is_refused() {
    let store = store();
    let before = store.get_job("2").unwrap().application_count;

    let application = store.apply_to_job(&application_draft("2", "3")).unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.applied_at, application.updated_at);

    let err = store.apply_to_job(&application_draft("2", "3")).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyApplied { .. }));
    assert_eq!(err.to_string(), "Already applied to this job");

    let after = store.get_job("2").unwrap().application_count;
    assert_eq!(after, before + 1);
}

#[test]
fn applying_requires_a_known_job_and_student() {
    let store = store();
    assert_eq!(
        store.apply_to_job(&application_draft("404", "1")).unwrap_err(),
        StoreError::not_found("Job", "404")
    );
    assert_eq!(
        store
            .apply_to_job(&application_draft("1", "404"))
            .unwrap_err()
            .to_string(),
        "Student not found"
    );
}

#[test]
fn each_detail_fetch_counts_a_view() {
    let store = store();
    let first = store.get_job("3").unwrap().view_count;
    let second = store.get_job("3").unwrap().view_count;
    assert_eq!(second, first + 1);
}

#[test]
fn new_job_takes_company_from_its_employer() {
    let store = store();
    let job = store.create_job(&job_draft("2")).unwrap();

    assert_eq!(job.company, "Mekong Finance");
    assert_eq!(job.company_id, "2");
    assert_eq!(job.requirements, vec!["Attention to detail", "English"]);
    assert_eq!(job.skills, vec!["Testing", "SQL"]);
    assert_eq!(job.view_count, 0);
    assert_eq!(job.application_count, 0);
    assert_eq!(store.employer_jobs("2").unwrap().items.len(), 3);
}

#[test]
fn employer_for_unknown_company_is_refused() {
    let store = store();
    let err = store.create_employer(&employer_draft("404")).unwrap_err();
    assert_eq!(err.to_string(), "Company not found");

    let employer = store.create_employer(&employer_draft("3")).unwrap();
    assert_eq!(employer.company.name, "Sao Mai Studio");
}

#[test]
fn company_changes_reach_embedded_copies() {
    let store = store();
    let toggled = store.toggle_company_verification("3").unwrap();
    assert!(toggled.is_verified);
    assert!(store.get_employer("3").unwrap().company.is_verified);

    let patch = CompanyPatch {
        name: Some("Sao Mai Creative".to_string()),
        ..CompanyPatch::default()
    };
    store.update_company("3", &patch).unwrap();
    assert_eq!(store.get_employer("3").unwrap().company.name, "Sao Mai Creative");
    assert_eq!(store.get_job("5").unwrap().company, "Sao Mai Creative");
}

#[test]
fn company_with_employers_cannot_be_deleted() {
    let store = store();
    assert!(matches!(
        store.delete_company("1"),
        Err(StoreError::Conflict(_))
    ));

    let company = store.create_company(&company_draft("Cang Xanh")).unwrap();
    store.delete_company(&company.id).unwrap();
    assert!(store.get_company(&company.id).is_err());
}

#[test]
fn skill_names_are_unique_ignoring_case() {
    let store = store();
    let err = store
        .create_skill(&SkillDraft {
            name: " rust ".to_string(),
            category: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Skill already exists");

    let created = store
        .create_skill(&SkillDraft {
            name: "Kotlin".to_string(),
            category: Some("Programming".to_string()),
        })
        .unwrap();
    assert!(store.list_skills().unwrap().items.contains(&created));

    store
        .create_skill(&SkillDraft {
            name: "Tiếng Việt".to_string(),
            category: Some("Languages".to_string()),
        })
        .unwrap();
    let err = store
        .create_skill(&SkillDraft {
            name: "TIẾNG VIỆT".to_string(),
            category: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Skill already exists");
}

#[test]
fn status_update_rejects_stale_writes() {
    let store = store();
    let current = store.job_applications("3").unwrap().items[0].clone();

    let stale = StatusChange::to(ApplicationStatus::Shortlisted)
        .expecting(current.updated_at - Duration::seconds(1));
    assert!(matches!(
        store.update_application_status(&current.id, &stale),
        Err(StoreError::Conflict(_))
    ));

    let fresh = StatusChange::to(ApplicationStatus::Shortlisted)
        .with_notes("call next week")
        .expecting(current.updated_at);
    let updated = store.update_application_status(&current.id, &fresh).unwrap();
    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
    assert_eq!(updated.employer_notes.as_deref(), Some("call next week"));
    assert!(updated.reviewed_at > current.reviewed_at);
}

#[test]
fn student_skills_are_spliced_by_id() {
    let store = store();
    let added = store
        .add_student_skill(
            "3",
            &StudentSkillDraft {
                name: "Illustrator".to_string(),
                level: None,
            },
        )
        .unwrap();
    let skill_id = added.skills.last().unwrap().id.clone();
    assert_eq!(added.skills.len(), 2);

    let updated = store
        .update_student_skill(
            "3",
            &skill_id,
            &StudentSkillDraft {
                name: "Illustrator".to_string(),
                level: Some("advanced".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.skills[1].level.as_deref(), Some("advanced"));
    assert_eq!(updated.skills[1].id, skill_id);

    let removed = store.remove_student_skill("3", &skill_id).unwrap();
    assert_eq!(removed.skills.len(), 1);
    assert!(store.remove_student_skill("3", &skill_id).is_err());
}

#[test]
fn experience_may_not_end_before_it_starts() {
    let store = store();
    let draft = ExperienceDraft {
        title: "Intern".to_string(),
        company: "Lotus Labs".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 5, 1),
        description: None,
    };
    assert!(matches!(
        store.add_experience("2", &draft),
        Err(StoreError::Validation(_))
    ));

    let draft = ExperienceDraft {
        end_date: None,
        ..draft
    };
    let student = store.add_experience("2", &draft).unwrap();
    let experience_id = student.experiences[0].id.clone();
    let student = store.remove_experience("2", &experience_id).unwrap();
    assert!(student.experiences.is_empty());
}

#[test]
fn list_jobs_filters_before_paging() {
    let store = store();
    let filters = FilterSpec {
        job_type: Some(JobType::Internship),
        limit: Some(1),
        ..FilterSpec::default()
    };

    let page = store.list_jobs(&filters).unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.pagination.total_pages, 2);
}

#[test]
fn tokens_map_to_seeded_users() {
    let store = MockStore::seeded();
    let admin = store.user_for_token(crate::mock::DEMO_ADMIN_TOKEN).unwrap();
    assert!(admin.is_some());
    assert!(store.user_for_token("nope").unwrap().is_none());
    assert!(MockStore::empty().list_skills().unwrap().items.is_empty());
}

#[test]
fn deleting_a_job_drops_its_applications() {
    let store = store();
    assert_eq!(store.student_applications("1").unwrap().items.len(), 1);

    store.delete_job("1").unwrap();

    assert!(store.student_applications("1").unwrap().items.is_empty());
    assert_eq!(
        store.job_applications("1").unwrap_err().to_string(),
        "Job not found"
    );
}

#[test]
fn new_jobs_take_the_posting_employers_company() {
    let store = store();
    let employer = store.get_employer("1").unwrap();

    let job = store.create_job(&job_draft("1")).unwrap();
    assert_eq!(job.company_id, employer.company_id);
    assert_eq!(job.company, employer.company.name);

    let err = store.create_job(&job_draft("999")).unwrap_err();
    assert_eq!(err.to_string(), "Employer not found");
}
