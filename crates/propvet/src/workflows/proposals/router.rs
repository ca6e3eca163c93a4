use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{DecisionChoice, ProposalDraft, ProposalPatch, SubmissionId, UserId};
use super::repository::{
    DirectoryError, NotificationSender, RepositoryError, StaffDirectory, SubmissionRecord,
    SubmissionRepository,
};
use super::service::{ProposalService, ProposalServiceError};
use super::settings::WorkflowSettings;

/// Router builder exposing the proposal workflow over HTTP.
pub fn proposal_router<R, D, N>(service: Arc<ProposalService<R, D, N>>) -> Router
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route(
            "/api/v1/proposals",
            post(submit_handler::<R, D, N>).get(list_handler::<R, D, N>),
        )
        .route(
            "/api/v1/proposals/auto-decide",
            post(auto_decide_handler::<R, D, N>),
        )
        .route(
            "/api/v1/proposals/:submission_id",
            get(get_handler::<R, D, N>).put(update_handler::<R, D, N>),
        )
        .route(
            "/api/v1/proposals/:submission_id/decision",
            post(decide_handler::<R, D, N>),
        )
        .route(
            "/api/v1/proposals/:submission_id/document",
            get(document_handler::<R, D, N>),
        )
        .route(
            "/api/v1/settings",
            get(settings_handler::<R, D, N>).put(update_settings_handler::<R, D, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorQuery {
    pub(crate) actor_id: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRequest {
    pub(crate) actor_id: UserId,
    #[serde(flatten)]
    pub(crate) patch: ProposalPatch,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) actor_id: UserId,
    pub(crate) decision: DecisionChoice,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AutoDecideRequest {
    pub(crate) actor_id: UserId,
    pub(crate) threshold: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsUpdateRequest {
    pub(crate) actor_id: UserId,
    #[serde(flatten)]
    pub(crate) settings: WorkflowSettings,
}

/// Outcome of a submit or update: the id plus the similarity snapshot.
#[derive(Debug, Serialize)]
pub(crate) struct SubmissionReceipt {
    pub(crate) id: SubmissionId,
    pub(crate) similarity: f64,
}

impl From<&SubmissionRecord> for SubmissionReceipt {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            id: record.id.clone(),
            similarity: record.similarity,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DecisionReceipt {
    pub(crate) id: SubmissionId,
    pub(crate) final_decision: &'static str,
}

pub(crate) async fn submit_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Json(draft): Json<ProposalDraft>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    match service.submit(draft) {
        Ok(record) => {
            (StatusCode::CREATED, Json(SubmissionReceipt::from(&record))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Path(submission_id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    let id = SubmissionId(submission_id);
    match service.update(request.actor_id, &id, request.patch) {
        Ok(record) => (StatusCode::OK, Json(SubmissionReceipt::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Path(submission_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(query.actor_id, &id) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    match service.list_for(query.actor_id) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(SubmissionRecord::view).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Path(submission_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    let id = SubmissionId(submission_id);
    match service.decide(request.actor_id, &id, request.decision) {
        Ok(record) => (
            StatusCode::OK,
            Json(DecisionReceipt {
                id: record.id.clone(),
                final_decision: record.final_decision.label(),
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn auto_decide_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Json(request): Json<AutoDecideRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    match service.auto_decide(request.actor_id, request.threshold) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn settings_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    match service.settings(query.actor_id) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_settings_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Json(request): Json<SettingsUpdateRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    match service.update_settings(request.actor_id, request.settings) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn document_handler<R, D, N>(
    State(service): State<Arc<ProposalService<R, D, N>>>,
    Path(submission_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    let id = SubmissionId(submission_id);
    match service.render_document(query.actor_id, &id) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.pdf\"", id.0),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ProposalServiceError) -> Response {
    let status = match &error {
        ProposalServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProposalServiceError::Access(_) => StatusCode::FORBIDDEN,
        ProposalServiceError::Directory(DirectoryError::UnknownUser(_)) => StatusCode::NOT_FOUND,
        ProposalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProposalServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
