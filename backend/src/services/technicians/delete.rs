use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, TECHNICIANS};
use actix_web::{web, HttpResponse};
use common::ErrorBody;

/// `DELETE /api/technicians/{id}`. Controls assigned to the technician keep
/// the dangling id.
pub async fn process(
    store: web::Data<DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let store = store.get_ref().clone();
    let target = id.clone();
    let removed = blocking(&format!("Failed to delete technician {id}"), move || {
        store.delete(TECHNICIANS, &target)
    })
    .await?;

    if !removed {
        return Err(ServiceError::NotFound(format!("Technician {id} not found")));
    }
    Ok(HttpResponse::Ok().json(ErrorBody::new(format!("Technician {id} deleted successfully"))))
}
