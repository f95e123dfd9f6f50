//! Axum router construction.
//!
//! Assembles the four resource groups into a single [`Router`] with CORS,
//! HTTP tracing, panic recovery, and the request body limit.

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use fieldwatch_core::Sighting;
use fieldwatch_types::{AnimalObservation, HumanActivityObservation, PhotoConsent, PlantObservation};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::ApiError;
use crate::handlers;
use crate::state::{AppState, Resource};

/// The router wrapped in trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- banner with the resource map
/// - `/api/plants` -- CRUD plus `GET /category/{category}`
/// - `/api/animals` -- CRUD plus `GET /type/{type}` and `GET /stats`
/// - `/api/human-activities` -- CRUD plus `GET /type/{type}` and `GET /stats`
/// - `/api/credit` -- photo consent CRUD
///
/// A trailing slash is trimmed before routing, so `/api/plants/` serves
/// `/api/plants`. Any other path or verb answers 404
/// `Cannot <METHOD> <path>`. Bodies larger than `max_body_bytes` are
/// refused with 413.
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> App {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let router = Router::new().route("/", get(handlers::index));
    let router = crud::<PlantObservation>(router, "/api/plants");
    let router = filter::<PlantObservation>(router, "/api/plants/category/{category}");
    let router = sighting::<AnimalObservation>(router, "/api/animals");
    let router = sighting::<HumanActivityObservation>(router, "/api/human-activities");
    let router = crud::<PhotoConsent>(router, "/api/credit");

    let router = router
        .fallback(handlers::no_route)
        .method_not_allowed_fallback(handlers::no_route)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);
    NormalizePath::trim_trailing_slash(router)
}

/// Collection and item routes under `base`.
fn crud<R: Resource>(router: Router<Arc<AppState>>, base: &str) -> Router<Arc<AppState>> {
    router
        .route(base, get(handlers::list::<R>).post(handlers::create::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(handlers::get::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
}

fn filter<R: Resource>(router: Router<Arc<AppState>>, path: &str) -> Router<Arc<AppState>> {
    router.route(path, get(handlers::list_by::<R>))
}

/// CRUD plus the type filter and statistics.
fn sighting<R: Resource + Sighting>(
    router: Router<Arc<AppState>>,
    base: &str,
) -> Router<Arc<AppState>> {
    let router = crud::<R>(router, base);
    let router = filter::<R>(router, &format!("{base}/type/{{type}}"));
    router.route(&format!("{base}/stats"), get(handlers::stats::<R>))
}

/// Render a caught panic as the 500 envelope.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "unknown panic".to_owned(), |s| (*s).to_owned()),
    };
    error!(%detail, "handler panicked");
    ApiError::Panic(detail).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn panic_payloads_become_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(String::from("owned boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
