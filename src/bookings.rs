use crate::auth::Claims;
use crate::backend::DocumentBackend;
use crate::error::AppError;
use crate::http::{run_backend, AppState};
use crate::types::{DeleteAcknowledgment, Document, InsertAcknowledgment, UpdateAcknowledgment};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Value,
}

/// The requested email has to match the email claim exactly, absence included.
/// An empty or absent filter lists every booking.
pub async fn list_bookings<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    debug!(requested = ?query.email, claimed = ?claims.email(), "Listing bookings");
    if query.email.as_deref() != claims.email() {
        return Err(AppError::Forbidden);
    }

    let email = query.email.filter(|email| !email.is_empty());
    let bookings = run_backend(state.backend, move |backend| {
        backend.bookings(email.as_deref())
    })
    .await?;
    Ok(Json(bookings))
}

pub async fn create_booking<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    Json(booking): Json<Document>,
) -> Result<Json<InsertAcknowledgment>, AppError> {
    let acknowledgment = run_backend(state.backend, move |backend| {
        backend.insert_booking(booking)
    })
    .await?;
    info!(id = %acknowledgment.inserted_id, "Booking created");
    Ok(Json(acknowledgment))
}

pub async fn update_booking_status<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<UpdateAcknowledgment>, AppError> {
    let acknowledgment = run_backend(state.backend, move |backend| {
        backend.update_booking_status(id, update.status)
    })
    .await?;
    info!(%id, modified = acknowledgment.modified_count, "Booking status updated");
    Ok(Json(acknowledgment))
}

pub async fn delete_booking<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAcknowledgment>, AppError> {
    let acknowledgment = run_backend(state.backend, move |backend| backend.delete_booking(id)).await?;
    info!(%id, deleted = acknowledgment.deleted_count, "Booking deleted");
    Ok(Json(acknowledgment))
}
