//! REST handlers.
//!
//! Handlers are generic over [`Resource`]; the router instantiates them
//! once per record kind. Each one delegates to the kind's
//! [`RecordService`](fieldwatch_core::RecordService) and wraps the result
//! in an [`Envelope`].

use std::sync::Arc;

use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use fieldwatch_core::Sighting;
use fieldwatch_types::ObservationStats;
use serde_json::json;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::extract::ApiBody;
use crate::state::{AppState, Resource};

/// `GET /` -- service banner and the resource map.
#[allow(clippy::unused_async)]
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "API is running...",
        "endpoints": {
            "plants": "/api/plants",
            "animals": "/api/animals",
            "humanActivities": "/api/human-activities",
            "credit": "/api/credit",
        }
    }))
}

/// `GET /api/<kind>` -- every record, newest first.
pub async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<R>>, ApiError> {
    let records = R::service(&state).list().await?;
    Ok(Envelope::list(records))
}

/// `GET /api/plants/category/{category}`, `GET /api/<kind>/type/{type}`.
pub async fn list_by<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Envelope<Vec<R>>, ApiError> {
    let records = R::service(&state).list_by(&key).await?;
    Ok(Envelope::list(records))
}

/// `POST /api/<kind>` -- validate and store a submission.
pub async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    ApiBody(body): ApiBody,
) -> Result<(StatusCode, Envelope<R>), ApiError> {
    let record = R::service(&state).create(body).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::data(record).with_message(R::KIND.created_message()),
    ))
}

/// `GET /api/<kind>/{id}`.
pub async fn get<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Envelope<R>, ApiError> {
    let record = R::service(&state).get(&id).await?;
    Ok(Envelope::data(record))
}

/// `PUT /api/<kind>/{id}` -- merge the body over the stored record.
pub async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiBody(patch): ApiBody,
) -> Result<Envelope<R>, ApiError> {
    let record = R::service(&state).update(&id, patch).await?;
    Ok(Envelope::data(record).with_message("Updated successfully"))
}

/// `DELETE /api/<kind>/{id}`.
pub async fn delete<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    R::service(&state).delete(&id).await?;
    Ok(Envelope::ok("Deleted successfully"))
}

/// `GET /api/<kind>/stats` -- aggregate counts and the recent feed.
pub async fn stats<R: Resource + Sighting>(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<ObservationStats<R::Recent>>, ApiError> {
    let report = R::service(&state).stats().await?;
    Ok(Envelope::data(report))
}

/// Fallback for unmatched paths and verbs.
#[allow(clippy::unused_async)]
pub async fn no_route(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    tracing::debug!(%method, %path, "no route");
    ApiError::NoRoute { method, path }
}
