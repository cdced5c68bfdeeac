use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, TECHNICIANS};
use actix_web::{web, HttpResponse};
use common::model::Technician;

/// `GET /api/technicians`: sorted by name, case-insensitively.
pub async fn process(store: web::Data<DocumentStore>) -> Result<HttpResponse, ServiceError> {
    let store = store.get_ref().clone();
    let mut technicians: Vec<Technician> =
        blocking("Failed to fetch technicians", move || store.list(TECHNICIANS)).await?;
    technicians.sort_by_key(|t| t.name.to_lowercase());
    Ok(HttpResponse::Ok().json(technicians))
}
