use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ClaimNumber, ClaimSubmission, Priority};
use super::repository::{ClaimRepository, RepositoryError};
use super::service::{ClaimService, ClaimServiceError, Resolution};

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriorityOverrideRequest {
    priority: Priority,
    actor: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteRequest {
    author: String,
    content: String,
}

/// Router builder exposing claim intake, triage and review endpoints.
pub fn claim_router<R>(service: Arc<ClaimService<R>>) -> Router
where
    R: ClaimRepository + 'static,
{
    Router::new()
        .route("/api/v1/claims", post(submit_handler::<R>))
        .route("/api/v1/claims/classify", post(classify_handler::<R>))
        .route("/api/v1/claims/:claim_number", get(status_handler::<R>))
        .route(
            "/api/v1/claims/:claim_number/resolve",
            post(resolve_handler::<R>),
        )
        .route(
            "/api/v1/claims/:claim_number/priority",
            post(priority_handler::<R>),
        )
        .route("/api/v1/claims/:claim_number/notes", post(note_handler::<R>))
        .with_state(service)
}

fn error_response(error: ClaimServiceError) -> Response {
    let status = match &error {
        ClaimServiceError::Classification(_)
        | ClaimServiceError::MissingProduct
        | ClaimServiceError::EmptyNote => StatusCode::UNPROCESSABLE_ENTITY,
        ClaimServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ClaimServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ClaimServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ClaimServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn classify_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    axum::Json(request): axum::Json<ClassifyRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.classify(&request.description).await {
        Ok(classification) => (StatusCode::OK, axum::Json(classification)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    axum::Json(submission): axum::Json<ClaimSubmission>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.create(submission, Utc::now()).await {
        Ok(claim) => (StatusCode::CREATED, axum::Json(claim)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    Path(claim_number): Path<String>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.get(&ClaimNumber(claim_number)) {
        Ok(claim) => (StatusCode::OK, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resolve_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    Path(claim_number): Path<String>,
    axum::Json(resolution): axum::Json<Resolution>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.resolve(&ClaimNumber(claim_number), resolution, Utc::now()) {
        Ok(claim) => (StatusCode::OK, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn priority_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    Path(claim_number): Path<String>,
    axum::Json(request): axum::Json<PriorityOverrideRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.override_priority(
        &ClaimNumber(claim_number),
        request.priority,
        &request.actor,
        Utc::now(),
    ) {
        Ok(claim) => (StatusCode::OK, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn note_handler<R>(
    State(service): State<Arc<ClaimService<R>>>,
    Path(claim_number): Path<String>,
    axum::Json(request): axum::Json<NoteRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    match service.add_note(
        &ClaimNumber(claim_number),
        &request.author,
        &request.content,
        Utc::now(),
    ) {
        Ok(claim) => (StatusCode::CREATED, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}
