use crate::backend::DocumentBackend;
use crate::error::AppError;
use crate::http::{run_backend, AppState};
use crate::types::{Document, ID_FIELD};
use axum::extract::{Path, State};
use axum::Json;

/// Fields returned by a single-service lookup.
const SERVICE_PROJECTION: [&str; 7] = [
    ID_FIELD,
    "title",
    "price",
    "service_id",
    "img",
    "description",
    "facility",
];

fn project_service(service: Document) -> Document {
    service
        .into_iter()
        .filter(|(field, _)| SERVICE_PROJECTION.contains(&field.as_str()))
        .collect()
}

pub async fn list_services<T: DocumentBackend>(
    State(state): State<AppState<T>>,
) -> Result<Json<Vec<Document>>, AppError> {
    let services = run_backend(state.backend, |backend| backend.services()).await?;
    Ok(Json(services))
}

pub async fn get_service<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    Path(service_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let service = run_backend(state.backend, move |backend| backend.service(&service_id)).await?;
    service
        .map(|service| Json(project_service(service)))
        .ok_or(AppError::NotFound)
}
