use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::{MockStore, ReferenceEncoder, StoreError};
use crate::domain::{
    ApplicationDraft, CompanyDraft, CompanyPatch, CvViewDraft, EmployerDraft, EmployerPatch,
    ExperienceDraft, JobPatch, JobSubmission, SkillDraft, StatusChange, StudentSkillDraft,
    UserRole,
};
use crate::normalize::ListPage;
use crate::query::FilterSpec;

type SharedStore = Arc<MockStore>;

/// HTTP surface of the mock backend. Each list endpoint answers in a
/// different one of the layouts the real backend is known to use.
pub fn mock_api_router(store: SharedStore) -> Router {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/jobs/:id/applications", get(job_applications))
        .route("/applications", post(apply_to_job))
        .route("/applications/:id/status", put(update_application_status))
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route(
            "/companies/:id/toggle-verification",
            post(toggle_company_verification),
        )
        .route("/employers", get(list_employers).post(create_employer))
        .route(
            "/employers/:id",
            get(get_employer).put(update_employer).delete(delete_employer),
        )
        .route("/employers/:id/jobs", get(employer_jobs))
        .route("/students", get(list_students))
        .route("/students/:id", get(get_student))
        .route("/students/:id/applications", get(student_applications))
        .route("/students/:id/skills", post(add_student_skill))
        .route(
            "/students/:id/skills/:skill_id",
            put(update_student_skill).delete(remove_student_skill),
        )
        .route("/students/:id/experiences", post(add_experience))
        .route(
            "/students/:id/experiences/:experience_id",
            put(update_experience).delete(remove_experience),
        )
        .route("/students/:id/cv-views", post(record_cv_view))
        .route("/skills", get(list_skills).post(create_skill))
        .route("/Admin/cv-views", get(cv_views))
        .route("/auth/verify", get(verify_session))
        .with_state(store)
}

fn to_wire<T: Serialize>(value: &T) -> Result<Value, Response> {
    serde_json::to_value(value).map_err(|err| {
        error!(error = %err, "failed to serialize mock response");
        let payload = json!({
            "success": false,
            "message": "failed to serialize response",
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    })
}

/// `{ success, message, data }` around a reference-encoded entity.
fn entity<T: Serialize>(status: StatusCode, message: &str, result: Result<T, StoreError>) -> Response {
    let value = match result {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };
    match to_wire(&value) {
        Ok(data) => {
            let payload = json!({
                "success": true,
                "message": message,
                "data": ReferenceEncoder::new().encode(data),
            });
            (status, Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

fn deleted(message: &str, result: Result<(), StoreError>) -> Response {
    match result {
        Ok(()) => {
            let payload = json!({ "success": true, "message": message, "data": null });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Top-level `{ $id, $values }` list.
fn values_list<T: Serialize>(result: Result<ListPage<T>, StoreError>) -> Response {
    let page = match result {
        Ok(page) => page,
        Err(err) => return err.into_response(),
    };
    match ReferenceEncoder::new().encode_items(&page.items) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to serialize mock list");
            StoreError::Unavailable.into_response()
        }
    }
}

/// `{ <key>: { $values }, totalCount, page, pageSize, totalPages }`.
fn collection_body<T: Serialize>(key: &str, page: &ListPage<T>) -> Result<Value, Response> {
    let items = to_wire(&page.items)?;
    let mut body = json!({
        "totalCount": page.pagination.total,
        "page": page.pagination.page,
        "pageSize": page.pagination.limit,
        "totalPages": page.pagination.total_pages,
    });
    if let Some(fields) = body.as_object_mut() {
        fields.insert(key.to_string(), items);
    }
    Ok(ReferenceEncoder::new().encode(body))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Response {
    let payload = json!({ "success": false, "message": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

async fn list_jobs(State(store): State<SharedStore>, Query(filters): Query<FilterSpec>) -> Response {
    match store.list_jobs(&filters) {
        Ok(page) => match collection_body("jobs", &page) {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(response) => response,
        },
        Err(err) => err.into_response(),
    }
}

async fn get_job(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    entity(StatusCode::OK, "", store.get_job(&id))
}

async fn create_job(
    State(store): State<SharedStore>,
    Json(submission): Json<JobSubmission>,
) -> Response {
    entity(StatusCode::CREATED, "Job created", store.submit_job(submission))
}

async fn update_job(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Response {
    entity(StatusCode::OK, "Job updated", store.update_job(&id, &patch))
}

async fn delete_job(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    deleted("Job deleted", store.delete_job(&id))
}

async fn job_applications(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    values_list(store.job_applications(&id))
}

async fn employer_jobs(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    match store.employer_jobs(&id) {
        Ok(page) => match collection_body("jobs", &page) {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(response) => response,
        },
        Err(err) => err.into_response(),
    }
}

async fn apply_to_job(
    State(store): State<SharedStore>,
    Json(draft): Json<ApplicationDraft>,
) -> Response {
    entity(
        StatusCode::CREATED,
        "Application submitted",
        store.apply_to_job(&draft),
    )
}

async fn update_application_status(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Response {
    entity(
        StatusCode::OK,
        "Application status updated",
        store.update_application_status(&id, &change),
    )
}

async fn student_applications(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    values_list(store.student_applications(&id))
}

async fn list_companies(
    State(store): State<SharedStore>,
    Query(filters): Query<FilterSpec>,
) -> Response {
    let page = match store.list_companies(&filters) {
        Ok(page) => page,
        Err(err) => return err.into_response(),
    };
    match to_wire(&page) {
        Ok(body) => (StatusCode::OK, Json(ReferenceEncoder::new().encode(body))).into_response(),
        Err(response) => response,
    }
}

async fn get_company(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    entity(StatusCode::OK, "", store.get_company(&id))
}

async fn create_company(
    State(store): State<SharedStore>,
    Json(draft): Json<CompanyDraft>,
) -> Response {
    entity(StatusCode::CREATED, "Company created", store.create_company(&draft))
}

async fn update_company(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<CompanyPatch>,
) -> Response {
    entity(StatusCode::OK, "Company updated", store.update_company(&id, &patch))
}

async fn delete_company(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    deleted("Company deleted", store.delete_company(&id))
}

async fn toggle_company_verification(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Response {
    entity(
        StatusCode::OK,
        "Company verification updated",
        store.toggle_company_verification(&id),
    )
}

async fn list_employers(
    State(store): State<SharedStore>,
    Query(filters): Query<FilterSpec>,
) -> Response {
    let page = match store.list_employers(&filters) {
        Ok(page) => page,
        Err(err) => return err.into_response(),
    };
    match collection_body("employers", &page) {
        Ok(data) => {
            let payload = json!({ "success": true, "message": "", "data": data });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

async fn get_employer(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    entity(StatusCode::OK, "", store.get_employer(&id))
}

async fn create_employer(
    State(store): State<SharedStore>,
    Json(draft): Json<EmployerDraft>,
) -> Response {
    entity(StatusCode::CREATED, "Employer created", store.create_employer(&draft))
}

async fn update_employer(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<EmployerPatch>,
) -> Response {
    entity(StatusCode::OK, "Employer updated", store.update_employer(&id, &patch))
}

async fn delete_employer(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    deleted("Employer deleted", store.delete_employer(&id))
}

async fn list_students(
    State(store): State<SharedStore>,
    Query(filters): Query<FilterSpec>,
) -> Response {
    let page = match store.list_students(&filters) {
        Ok(page) => page,
        Err(err) => return err.into_response(),
    };
    let items = match to_wire(&page.items) {
        Ok(Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(response) => return response,
    };
    let payload = json!({
        "pagination": page.pagination,
        "data": ReferenceEncoder::new().encode_each(items),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn get_student(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    entity(StatusCode::OK, "", store.get_student(&id))
}

async fn add_student_skill(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(draft): Json<StudentSkillDraft>,
) -> Response {
    entity(StatusCode::CREATED, "Skill added", store.add_student_skill(&id, &draft))
}

async fn update_student_skill(
    State(store): State<SharedStore>,
    Path((id, skill_id)): Path<(String, String)>,
    Json(draft): Json<StudentSkillDraft>,
) -> Response {
    entity(
        StatusCode::OK,
        "Skill updated",
        store.update_student_skill(&id, &skill_id, &draft),
    )
}

async fn remove_student_skill(
    State(store): State<SharedStore>,
    Path((id, skill_id)): Path<(String, String)>,
) -> Response {
    entity(
        StatusCode::OK,
        "Skill removed",
        store.remove_student_skill(&id, &skill_id),
    )
}

async fn add_experience(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(draft): Json<ExperienceDraft>,
) -> Response {
    entity(StatusCode::CREATED, "Experience added", store.add_experience(&id, &draft))
}

async fn update_experience(
    State(store): State<SharedStore>,
    Path((id, experience_id)): Path<(String, String)>,
    Json(draft): Json<ExperienceDraft>,
) -> Response {
    entity(
        StatusCode::OK,
        "Experience updated",
        store.update_experience(&id, &experience_id, &draft),
    )
}

async fn remove_experience(
    State(store): State<SharedStore>,
    Path((id, experience_id)): Path<(String, String)>,
) -> Response {
    entity(
        StatusCode::OK,
        "Experience removed",
        store.remove_experience(&id, &experience_id),
    )
}

async fn record_cv_view(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(draft): Json<CvViewDraft>,
) -> Response {
    entity(StatusCode::CREATED, "", store.record_cv_view(&id, &draft))
}

async fn list_skills(State(store): State<SharedStore>) -> Response {
    let page = match store.list_skills() {
        Ok(page) => page,
        Err(err) => return err.into_response(),
    };
    match to_wire(&page.items) {
        Ok(Value::Array(items)) => {
            let body = Value::Array(ReferenceEncoder::new().encode_each(items));
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(other) => (StatusCode::OK, Json(other)).into_response(),
        Err(response) => response,
    }
}

async fn create_skill(State(store): State<SharedStore>, Json(draft): Json<SkillDraft>) -> Response {
    entity(StatusCode::CREATED, "Skill created", store.create_skill(&draft))
}

async fn cv_views(State(store): State<SharedStore>, headers: HeaderMap) -> Response {
    let user = match bearer_token(&headers).map(|token| store.user_for_token(token)) {
        Some(Ok(Some(user))) => user,
        Some(Err(err)) => return err.into_response(),
        _ => return unauthorized(),
    };
    if user.role != UserRole::Admin {
        let payload = json!({ "success": false, "message": "Forbidden" });
        return (StatusCode::FORBIDDEN, Json(payload)).into_response();
    }
    values_list(store.cv_views())
}

async fn verify_session(State(store): State<SharedStore>, headers: HeaderMap) -> Response {
    match bearer_token(&headers).map(|token| store.user_for_token(token)) {
        Some(Ok(Some(user))) => entity(StatusCode::OK, "", Ok(user)),
        Some(Err(err)) => err.into_response(),
        _ => unauthorized(),
    }
}
