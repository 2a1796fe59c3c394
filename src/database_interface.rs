use crate::backend::DocumentBackend;
use crate::error::BackendError;
use crate::schema::{bookings, services};
use crate::types::{
    with_id, without_id, DeleteAcknowledgment, Document, InsertAcknowledgment,
    UpdateAcknowledgment,
};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub document: Value,
}

#[derive(Insertable)]
#[diesel(table_name = services)]
pub struct NewService {
    pub service_id: String,
    pub document: Value,
}

#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, BackendError> {
        let connection = PgConnection::establish(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, BackendError> {
        self.connection.lock().map_err(|_| BackendError::Poisoned)
    }
}

fn into_document((id, document): (Uuid, Value)) -> Result<Document, BackendError> {
    match document {
        Value::Object(document) => Ok(with_id(id, document)),
        _ => Err(BackendError::MalformedDocument),
    }
}

impl DocumentBackend for DatabaseInterface {
    fn ping(&self) -> Result<(), BackendError> {
        let mut connection = self.connection()?;
        diesel::sql_query("SELECT 1").execute(&mut *connection)?;
        Ok(())
    }

    fn services(&self) -> Result<Vec<Document>, BackendError> {
        let mut connection = self.connection()?;
        services::table
            .select((services::id, services::document))
            .load::<(Uuid, Value)>(&mut *connection)?
            .into_iter()
            .map(into_document)
            .collect()
    }

    fn service(&self, service_id: &str) -> Result<Option<Document>, BackendError> {
        let mut connection = self.connection()?;
        services::table
            .filter(services::service_id.eq(service_id))
            .select((services::id, services::document))
            .first::<(Uuid, Value)>(&mut *connection)
            .optional()?
            .map(into_document)
            .transpose()
    }

    fn insert_services(&self, new_services: Vec<Document>) -> Result<usize, BackendError> {
        let rows: Vec<NewService> = new_services
            .into_iter()
            .filter_map(|service| {
                let Some(service_id) = service.get("service_id").and_then(Value::as_str) else {
                    warn!("Skipping service without a string service_id");
                    return None;
                };
                Some(NewService {
                    service_id: service_id.to_owned(),
                    document: Value::Object(without_id(service)),
                })
            })
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }

        let mut connection = self.connection()?;
        let inserted = diesel::insert_into(services::table)
            .values(&rows)
            .on_conflict(services::service_id)
            .do_nothing()
            .execute(&mut *connection)?;
        Ok(inserted)
    }

    fn bookings(&self, email: Option<&str>) -> Result<Vec<Document>, BackendError> {
        let mut connection = self.connection()?;
        let query = bookings::table.select((bookings::id, bookings::document));
        let rows: Vec<(Uuid, Value)> = match email {
            Some(email) => query
                .filter(sql::<Bool>("document ->> 'email' = ").bind::<Text, _>(email))
                .load(&mut *connection)?,
            None => query.load(&mut *connection)?,
        };
        rows.into_iter().map(into_document).collect()
    }

    fn insert_booking(&self, booking: Document) -> Result<InsertAcknowledgment, BackendError> {
        let mut connection = self.connection()?;
        let booking = NewBooking {
            document: Value::Object(without_id(booking)),
        };
        let inserted_id = diesel::insert_into(bookings::table)
            .values(&booking)
            .returning(bookings::id)
            .get_result::<Uuid>(&mut *connection)?;
        Ok(InsertAcknowledgment::new(inserted_id))
    }

    fn update_booking_status(
        &self,
        id: Uuid,
        status: Value,
    ) -> Result<UpdateAcknowledgment, BackendError> {
        let mut connection = self.connection()?;
        connection.transaction::<_, BackendError, _>(|connection| {
            let current = bookings::table
                .find(id)
                .select(bookings::document)
                .first::<Value>(connection)
                .optional()?;

            let mut document = match current {
                Some(Value::Object(document)) => document,
                Some(_) => return Err(BackendError::MalformedDocument),
                None => return Ok(UpdateAcknowledgment::new(0, 0)),
            };
            if document.get("status") == Some(&status) {
                return Ok(UpdateAcknowledgment::new(1, 0));
            }

            document.insert("status".into(), status);
            diesel::update(bookings::table.find(id))
                .set(bookings::document.eq(Value::Object(document)))
                .execute(connection)?;
            Ok(UpdateAcknowledgment::new(1, 1))
        })
    }

    fn delete_booking(&self, id: Uuid) -> Result<DeleteAcknowledgment, BackendError> {
        let mut connection = self.connection()?;
        let deleted = diesel::delete(bookings::table.find(id)).execute(&mut *connection)?;
        Ok(DeleteAcknowledgment::new(deleted as u64))
    }
}
