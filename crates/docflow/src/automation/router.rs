use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dispatcher::{AutomationDispatcher, DispatchError};
use super::domain::{FilingRecord, JobId, SubmissionId};
use super::service_type::ServiceType;
use super::store::{JobStore, RecordStore, StoreError};

/// Shared handler state: the dispatcher plus read handles on both stores.
pub struct AutomationState<R, J> {
    pub dispatcher: Arc<AutomationDispatcher<R, J>>,
    pub records: Arc<R>,
    pub jobs: Arc<J>,
}

impl<R, J> Clone for AutomationState<R, J> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            records: self.records.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

/// Router builder exposing the automation trigger and the status read
/// paths upstream services poll.
pub fn automation_router<R, J>(state: AutomationState<R, J>) -> Router
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/automation/submissions/:submission_id/start",
            post(start_handler::<R, J>),
        )
        .route(
            "/api/v1/automation/submissions/:submission_id",
            get(record_handler::<R, J>),
        )
        .route(
            "/api/v1/automation/submissions/:submission_id/jobs",
            get(submission_jobs_handler::<R, J>),
        )
        .route("/api/v1/automation/jobs/:job_id", get(job_handler::<R, J>))
        .with_state(state)
}

/// Start request body. `uploaded_documents`, when present, is attached to
/// the (lazily created) record before the pipeline is scheduled; the full
/// document-upload surface lives elsewhere.
#[derive(Debug, Deserialize)]
pub struct StartAutomationRequest {
    pub service_type: String,
    #[serde(default)]
    pub uploaded_documents: Option<BTreeMap<String, String>>,
}

pub(crate) async fn start_handler<R, J>(
    State(state): State<AutomationState<R, J>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<StartAutomationRequest>,
) -> Response
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    let submission_id = SubmissionId(submission_id);

    if let Some(documents) = request.uploaded_documents {
        let service_type = ServiceType::normalize(&request.service_type);
        let seeded = state
            .records
            .insert_if_absent(FilingRecord::new(submission_id.clone(), service_type))
            .and_then(|_| state.records.attach_documents(&submission_id, documents));
        if let Err(err) = seeded {
            return store_failure(err);
        }
    }

    match state.dispatcher.start(&submission_id, &request.service_type) {
        Ok(job_id) => match state.jobs.fetch(&job_id) {
            Ok(Some(ticket)) => {
                (StatusCode::ACCEPTED, axum::Json(ticket.status_view())).into_response()
            }
            Ok(None) => (StatusCode::ACCEPTED, axum::Json(json!({ "job_id": job_id })))
                .into_response(),
            Err(err) => store_failure(err),
        },
        Err(DispatchError::Store(err)) => store_failure(err),
    }
}

pub(crate) async fn job_handler<R, J>(
    State(state): State<AutomationState<R, J>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    let id = JobId(job_id);
    match state.jobs.fetch(&id) {
        Ok(Some(ticket)) => (StatusCode::OK, axum::Json(ticket.status_view())).into_response(),
        Ok(None) => not_found(json!({ "error": format!("job '{}' not found", id.0) })),
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn record_handler<R, J>(
    State(state): State<AutomationState<R, J>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    let id = SubmissionId(submission_id);
    match state.records.fetch(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Ok(None) => not_found(json!({
            "error": format!("no record for submission '{}'", id.0)
        })),
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn submission_jobs_handler<R, J>(
    State(state): State<AutomationState<R, J>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: RecordStore + 'static,
    J: JobStore + 'static,
{
    let id = SubmissionId(submission_id);
    match state.jobs.find_by_submission(&id) {
        Ok(tickets) => {
            let views: Vec<_> = tickets.iter().map(|ticket| ticket.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => store_failure(err),
    }
}

fn not_found(payload: serde_json::Value) -> Response {
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn store_failure(err: StoreError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
