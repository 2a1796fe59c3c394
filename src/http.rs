use crate::auth::{issue_token, verify_token, Credentials};
use crate::backend::DocumentBackend;
use crate::bookings::{create_booking, delete_booking, list_bookings, update_booking_status};
use crate::catalog::{get_service, list_services};
use crate::configuration::Configuration;
use crate::error::{AppError, BackendError};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState<T: DocumentBackend> {
    pub backend: T,
    pub credentials: Credentials,
}

pub fn create_app<T: DocumentBackend, C: Configuration>(backend: T, configuration: C) -> Router {
    let state = AppState {
        backend,
        credentials: Credentials::new(
            &configuration.access_token_secret(),
            configuration.token_lifetime(),
            configuration.secure_cookies(),
        ),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<T>))
        .route(
            "/jwt",
            post(issue_token::<T>).route_layer(middleware::from_fn(log_request)),
        )
        .route(
            "/services",
            get(list_services::<T>).route_layer(middleware::from_fn(log_request)),
        )
        .route("/services/:id", get(get_service::<T>))
        .route(
            "/bookings",
            get(list_bookings::<T>)
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    verify_token::<T>,
                ))
                .route_layer(middleware::from_fn(log_request))
                .post(create_booking::<T>),
        )
        .route(
            "/bookings/:id",
            patch(update_booking_status::<T>).delete(delete_booking::<T>),
        )
        .with_state(state)
        .layer(cors_layer(&configuration.allowed_origins()))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(err) => {
                warn!(%origin, %err, "Ignoring invalid allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Hands a storage call to the blocking pool so the runtime keeps serving
/// other requests while it waits on the database.
pub async fn run_backend<T, F, R>(backend: T, operation: F) -> Result<R, AppError>
where
    T: DocumentBackend,
    F: FnOnce(&T) -> Result<R, BackendError> + Send + 'static,
    R: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || operation(&backend)).await?;
    Ok(result?)
}

async fn log_request(request: Request, next: Next) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    info!(method = %request.method(), host = %host, path = %request.uri(), "called");
    next.run(request).await
}

async fn root() -> &'static str {
    "Doctor Is Running Very Soon"
}

async fn health<T: DocumentBackend>(State(state): State<AppState<T>>) -> impl IntoResponse {
    match run_backend(state.backend, |backend| backend.ping()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(err) => {
            warn!(%err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
