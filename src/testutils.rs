use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::Duration;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    backend::DocumentBackend,
    configuration::Configuration,
    error::BackendError,
    types::{
        with_id, DeleteAcknowledgment, Document, InsertAcknowledgment, UpdateAcknowledgment,
    },
};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_ORIGIN: &str = "https://cars-doctor-1f496.web.app";

#[derive(Clone, Default)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn port(&self) -> String {
        "0".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn access_token_secret(&self) -> String {
        TEST_SECRET.into()
    }

    fn allowed_origins(&self) -> Vec<String> {
        vec![TEST_ORIGIN.into()]
    }

    fn secure_cookies(&self) -> bool {
        false
    }

    fn token_lifetime(&self) -> Duration {
        Duration::hours(1)
    }

    fn services_file(&self) -> Option<PathBuf> {
        None
    }
}

pub struct MockDocumentBackendInner {
    pub success: AtomicBool,
    pub calls_to_ping: AtomicU64,
    pub calls_to_services: AtomicU64,
    pub calls_to_service: AtomicU64,
    pub calls_to_insert_services: AtomicU64,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_insert_booking: AtomicU64,
    pub calls_to_update_booking_status: AtomicU64,
    pub calls_to_delete_booking: AtomicU64,
    pub services: Mutex<Vec<Document>>,
    pub bookings: Mutex<Vec<Document>>,
}

#[derive(Clone)]
pub struct MockDocumentBackend(pub Arc<MockDocumentBackendInner>);

impl MockDocumentBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_ping: AtomicU64::default(),
            calls_to_services: AtomicU64::default(),
            calls_to_service: AtomicU64::default(),
            calls_to_insert_services: AtomicU64::default(),
            calls_to_bookings: AtomicU64::default(),
            calls_to_insert_booking: AtomicU64::default(),
            calls_to_update_booking_status: AtomicU64::default(),
            calls_to_delete_booking: AtomicU64::default(),
            services: Mutex::default(),
            bookings: Mutex::default(),
        }
    }
}

impl MockDocumentBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockDocumentBackendInner::new()))
    }

    pub fn backend_calls(&self) -> u64 {
        [
            &self.0.calls_to_ping,
            &self.0.calls_to_services,
            &self.0.calls_to_service,
            &self.0.calls_to_insert_services,
            &self.0.calls_to_bookings,
            &self.0.calls_to_insert_booking,
            &self.0.calls_to_update_booking_status,
            &self.0.calls_to_delete_booking,
        ]
        .iter()
        .map(|calls| calls.load(Ordering::SeqCst))
        .sum()
    }

    fn result(&self) -> Result<(), BackendError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BackendError::Poisoned),
        }
    }
}

impl DocumentBackend for MockDocumentBackend {
    fn ping(&self) -> Result<(), BackendError> {
        self.0.calls_to_ping.fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn services(&self) -> Result<Vec<Document>, BackendError> {
        self.0.calls_to_services.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.services.lock().unwrap().clone())
    }

    fn service(&self, service_id: &str) -> Result<Option<Document>, BackendError> {
        self.0.calls_to_service.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self
            .0
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|service| service.get("service_id").and_then(Value::as_str) == Some(service_id))
            .cloned())
    }

    fn insert_services(&self, services: Vec<Document>) -> Result<usize, BackendError> {
        self.0
            .calls_to_insert_services
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let inserted = services.len();
        self.0.services.lock().unwrap().extend(services);
        Ok(inserted)
    }

    fn bookings(&self, email: Option<&str>) -> Result<Vec<Document>, BackendError> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self
            .0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| {
                email.is_none() || booking.get("email").and_then(Value::as_str) == email
            })
            .cloned()
            .collect())
    }

    fn insert_booking(&self, booking: Document) -> Result<InsertAcknowledgment, BackendError> {
        self.0
            .calls_to_insert_booking
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let id = Uuid::new_v4();
        self.0.bookings.lock().unwrap().push(with_id(id, booking));
        Ok(InsertAcknowledgment::new(id))
    }

    fn update_booking_status(
        &self,
        _id: Uuid,
        _status: Value,
    ) -> Result<UpdateAcknowledgment, BackendError> {
        self.0
            .calls_to_update_booking_status
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(UpdateAcknowledgment::new(1, 1))
    }

    fn delete_booking(&self, _id: Uuid) -> Result<DeleteAcknowledgment, BackendError> {
        self.0
            .calls_to_delete_booking
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(DeleteAcknowledgment::new(1))
    }
}
