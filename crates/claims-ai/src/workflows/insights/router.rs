use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{InsightAggregator, InsightError, ReportingPeriod};
use crate::workflows::claims::domain::StoreId;
use crate::workflows::claims::repository::{ClaimRepository, RepositoryError};

#[derive(Debug, Deserialize)]
pub(crate) struct InsightQuery {
    #[serde(default)]
    period: Option<String>,
}

/// Router exposing the per-store insight report.
pub fn insight_router<R>(aggregator: Arc<InsightAggregator<R>>) -> Router
where
    R: ClaimRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/stores/:store_id/insights",
            get(insights_handler::<R>),
        )
        .with_state(aggregator)
}

pub(crate) async fn insights_handler<R>(
    State(aggregator): State<Arc<InsightAggregator<R>>>,
    Path(store_id): Path<String>,
    Query(query): Query<InsightQuery>,
) -> Response
where
    R: ClaimRepository + 'static,
{
    let period = match ReportingPeriod::parse_or_default(query.period.as_deref()) {
        Ok(period) => period,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let store_id = StoreId(store_id);
    match aggregator.build_insights(&store_id, period, Utc::now()).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(InsightError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": format!("store {} not found", store_id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
