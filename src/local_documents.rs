use crate::backend::DocumentBackend;
use crate::error::BackendError;
use crate::types::{
    with_id, without_id, DeleteAcknowledgment, Document, InsertAcknowledgment,
    UpdateAcknowledgment,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

type Collection = Vec<(Uuid, Document)>;

/// Non-persistent backend used when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct LocalDocuments {
    services: Arc<Mutex<Collection>>,
    bookings: Arc<Mutex<Collection>>,
}

fn lock(collection: &Mutex<Collection>) -> Result<MutexGuard<'_, Collection>, BackendError> {
    collection.lock().map_err(|_| BackendError::Poisoned)
}

impl DocumentBackend for LocalDocuments {
    fn ping(&self) -> Result<(), BackendError> {
        lock(&self.services)?;
        lock(&self.bookings)?;
        Ok(())
    }

    fn services(&self) -> Result<Vec<Document>, BackendError> {
        Ok(lock(&self.services)?
            .iter()
            .map(|(id, service)| with_id(*id, service.clone()))
            .collect())
    }

    fn service(&self, service_id: &str) -> Result<Option<Document>, BackendError> {
        Ok(lock(&self.services)?
            .iter()
            .find(|(_, service)| service.get("service_id").and_then(Value::as_str) == Some(service_id))
            .map(|(id, service)| with_id(*id, service.clone())))
    }

    fn insert_services(&self, new_services: Vec<Document>) -> Result<usize, BackendError> {
        let mut services = lock(&self.services)?;
        let mut inserted = 0;
        for service in new_services {
            let Some(service_id) = service.get("service_id").and_then(Value::as_str) else {
                warn!("Skipping service without a string service_id");
                continue;
            };
            let exists = services
                .iter()
                .any(|(_, stored)| stored.get("service_id").and_then(Value::as_str) == Some(service_id));
            if !exists {
                services.push((Uuid::new_v4(), without_id(service)));
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn bookings(&self, email: Option<&str>) -> Result<Vec<Document>, BackendError> {
        Ok(lock(&self.bookings)?
            .iter()
            .filter(|(_, booking)| match email {
                Some(email) => booking.get("email").and_then(Value::as_str) == Some(email),
                None => true,
            })
            .map(|(id, booking)| with_id(*id, booking.clone()))
            .collect())
    }

    fn insert_booking(&self, booking: Document) -> Result<InsertAcknowledgment, BackendError> {
        let id = Uuid::new_v4();
        lock(&self.bookings)?.push((id, without_id(booking)));
        Ok(InsertAcknowledgment::new(id))
    }

    fn update_booking_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateAcknowledgment, BackendError> {
        let mut bookings = lock(&self.bookings)?;
        match bookings.iter_mut().find(|(booking_id, _)| *booking_id == id) {
            Some((_, booking)) if booking.get("status") == Some(&status) => {
                Ok(UpdateAcknowledgment::new(1, 0))
            }
            Some((_, booking)) => {
                booking.insert("status".into(), status);
                Ok(UpdateAcknowledgment::new(1, 1))
            }
            None => Ok(UpdateAcknowledgment::new(0, 0)),
        }
    }

    fn delete_booking(&self, id: Uuid) -> Result<DeleteAcknowledgment, BackendError> {
        let mut bookings = lock(&self.bookings)?;
        let before = bookings.len();
        bookings.retain(|(booking_id, _)| *booking_id != id);
        Ok(DeleteAcknowledgment::new((before - bookings.len()) as u64))
    }
}
