use crate::error::BackendError;
use crate::types::{DeleteAcknowledgment, Document, InsertAcknowledgment, UpdateAcknowledgment};
use serde_json::Value;
use uuid::Uuid;

pub trait DocumentBackend: Clone + Send + Sync + 'static {
    fn ping(&self) -> Result<(), BackendError>;
    fn services(&self) -> Result<Vec<Document>, BackendError>;
    fn service(&self, service_id: &str) -> Result<Option<Document>, BackendError>;
    /// Inserts services whose `service_id` is not stored yet. Returns the number inserted.
    fn insert_services(&self, services: Vec<Document>) -> Result<usize, BackendError>;
    fn bookings(&self, email: Option<&str>) -> Result<Vec<Document>, BackendError>;
    fn insert_booking(&self, booking: Document) -> Result<InsertAcknowledgment, BackendError>;
    fn update_booking_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateAcknowledgment, BackendError>;
    fn delete_booking(&self, id: Uuid) -> Result<DeleteAcknowledgment, BackendError>;
}
