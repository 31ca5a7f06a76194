//! The REST client talking to the mock backend over a real socket, and the
//! service falling back to local data when no backend answers.

use std::sync::Arc;

use careerlink::client::{ApiClient, ApiError};
use careerlink::domain::{ApplicationDraft, ExperienceLevel, JobDraft, JobType, UserRole};
use careerlink::mock::{MockStore, DEMO_ADMIN_TOKEN, DEMO_EMPLOYER_TOKEN};
use careerlink::query::FilterSpec;
use careerlink::service::{CareerLinkService, ServiceError};

mod common {
    use std::sync::Arc;

    use careerlink::client::ApiClient;
    use careerlink::mock::{mock_api_router, MockStore};

    /// Serves `store` on an ephemeral port and returns a client pointed at it.
    pub(super) async fn backend(store: Arc<MockStore>) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, mock_api_router(store))
                .await
                .expect("mock backend serves");
        });
        ApiClient::new(format!("http://{addr}/"), 10)
    }

    pub(super) fn unreachable() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1", 10)
    }
}

fn intern_draft() -> JobDraft {
    JobDraft {
        employer_id: "2".to_string(),
        title: "Treasury Intern".to_string(),
        description: "Support the cash management desk".to_string(),
        requirements: "Finance major, Excel".to_string(),
        responsibilities: None,
        skills: "Excel, SQL".to_string(),
        salary: None,
        location: "Ho Chi Minh City".to_string(),
        job_type: JobType::Internship,
        experience_level: ExperienceLevel::Entry,
        application_deadline: None,
        status: None,
        is_remote: false,
    }
}

#[tokio::test]
async fn every_list_layout_decodes_into_typed_pages() {
    let client = common::backend(Arc::new(MockStore::seeded())).await;

    let jobs = client.list_jobs(&FilterSpec::default()).await.expect("jobs");
    assert_eq!(jobs.pagination.total, 6);
    assert_eq!(jobs.items.len(), 6);

    let companies = client
        .list_companies(&FilterSpec::default())
        .await
        .expect("companies");
    assert_eq!(companies.items.len(), 3);

    let employers = client
        .list_employers(&FilterSpec::default())
        .await
        .expect("employers");
    assert_eq!(employers.items.len(), 3);
    assert_eq!(employers.items[0].company.name, "Lotus Labs");

    let students = client
        .list_students(&FilterSpec::default())
        .await
        .expect("students");
    assert_eq!(students.pagination.total, 4);
    assert!(students.items.iter().any(|student| !student.skills.is_empty()));

    let skills = client.list_skills().await.expect("skills");
    assert_eq!(skills.items.len(), 8);
}

#[tokio::test]
async fn filters_travel_as_query_parameters() {
    let client = common::backend(Arc::new(MockStore::seeded())).await;
    let filters = FilterSpec {
        query: Some("designer".to_string()),
        is_remote: Some(true),
        ..FilterSpec::default()
    };

    let page = client.list_jobs(&filters).await.expect("jobs");

    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].title, "Product Designer");
}

#[tokio::test]
async fn created_job_is_visible_to_the_backend_store() {
    let store = Arc::new(MockStore::seeded());
    let client = common::backend(store.clone()).await;

    let job = client.create_job(&intern_draft()).await.expect("job created");

    assert_eq!(job.company, "Mekong Finance");
    assert_eq!(job.skills, vec!["Excel".to_string(), "SQL".to_string()]);
    let stored = store.get_job(&job.id).expect("stored job");
    assert_eq!(stored.title, "Treasury Intern");
}

#[tokio::test]
async fn duplicate_application_surfaces_backend_message() {
    let client = common::backend(Arc::new(MockStore::seeded())).await;
    let draft = ApplicationDraft {
        job_id: "1".to_string(),
        student_id: "1".to_string(),
        cover_letter: None,
        resume_url: None,
    };

    let error = client.apply_to_job(&draft).await.expect_err("duplicate");

    match error {
        ApiError::Http { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Already applied to this job");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn bearer_token_identifies_the_session() {
    let client = common::backend(Arc::new(MockStore::seeded())).await;

    let anonymous = client.verify_session().await.expect_err("no token");
    assert_eq!(anonymous.status(), Some(401));

    let admin = client.clone().with_token(DEMO_ADMIN_TOKEN);
    let user = admin.verify_session().await.expect("admin verified");
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(admin.cv_views().await.expect("cv views").items.len(), 1);

    let employer = client.with_token(DEMO_EMPLOYER_TOKEN);
    let forbidden = employer.cv_views().await.expect_err("admins only");
    assert_eq!(forbidden.status(), Some(403));
}

#[tokio::test]
async fn service_prefers_the_reachable_backend() {
    let remote_store = Arc::new(MockStore::seeded());
    let client = common::backend(remote_store.clone()).await;
    let local_store = Arc::new(MockStore::empty());
    let service = CareerLinkService::new(Some(client), local_store.clone(), true);

    let job = service.create_job(&intern_draft()).await.expect("created");

    assert!(remote_store.get_job(&job.id).is_ok());
    assert!(local_store.get_job(&job.id).is_err());
}

#[tokio::test]
async fn unreachable_backend_serves_mock_students() {
    let service = CareerLinkService::new(
        Some(common::unreachable()),
        Arc::new(MockStore::seeded()),
        true,
    );
    let filters = FilterSpec {
        gpa: Some(3.5),
        ..FilterSpec::default()
    };

    let page = service.list_students(&filters).await.expect("fallback");

    assert_eq!(page.pagination.total, 2);
}

#[tokio::test]
async fn http_errors_are_not_masked_by_fallback() {
    let client = common::backend(Arc::new(MockStore::seeded())).await;
    let service = CareerLinkService::new(Some(client), Arc::new(MockStore::seeded()), true);

    let error = service.get_company("404").await.expect_err("missing");

    assert!(matches!(
        error,
        ServiceError::Api(ApiError::Http { status: 404, .. })
    ));
    assert_eq!(error.user_message(), "Company not found");
}

#[tokio::test]
async fn company_verification_is_toggled_remotely() {
    let store = Arc::new(MockStore::seeded());
    let client = common::backend(store.clone()).await;

    let company = client
        .toggle_company_verification("3")
        .await
        .expect("verification toggled");

    assert!(company.is_verified);
    assert!(store.get_company("3").expect("company exists").is_verified);
}
