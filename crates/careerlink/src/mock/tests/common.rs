use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::domain::{
    ApplicationDraft, CompanyDraft, EmployerDraft, ExperienceLevel, JobDraft, JobType,
};
use crate::mock::{mock_api_router, MockStore};

pub(super) fn store() -> Arc<MockStore> {
    Arc::new(MockStore::seeded())
}

pub(super) fn router_with_store() -> (Router, Arc<MockStore>) {
    let store = store();
    (mock_api_router(store.clone()), store)
}

pub(super) fn job_draft(employer_id: &str) -> JobDraft {
    JobDraft {
        employer_id: employer_id.to_string(),
        title: "QA Intern".to_string(),
        description: "Write test plans".to_string(),
        requirements: "Attention to detail, English".to_string(),
        responsibilities: Some("Test releases".to_string()),
        skills: "Testing, SQL".to_string(),
        salary: None,
        location: "Hanoi".to_string(),
        job_type: JobType::Internship,
        experience_level: ExperienceLevel::Entry,
        application_deadline: None,
        status: None,
        is_remote: false,
    }
}

pub(super) fn application_draft(job_id: &str, student_id: &str) -> ApplicationDraft {
    ApplicationDraft {
        job_id: job_id.to_string(),
        student_id: student_id.to_string(),
        cover_letter: Some("Keen to learn".to_string()),
        resume_url: None,
    }
}

pub(super) fn company_draft(name: &str) -> CompanyDraft {
    CompanyDraft {
        name: name.to_string(),
        industry: "Logistics".to_string(),
        city: Some("Hai Phong".to_string()),
        ..CompanyDraft::default()
    }
}

pub(super) fn employer_draft(company_id: &str) -> EmployerDraft {
    EmployerDraft {
        user_id: "99".to_string(),
        company_id: company_id.to_string(),
        full_name: "Ngo Bich Ngoc".to_string(),
        email: "ngoc@example.vn".to_string(),
        position: Some("Recruiter".to_string()),
        phone: None,
        created_by: Some("1".to_string()),
    }
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub(super) fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub(super) fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}
