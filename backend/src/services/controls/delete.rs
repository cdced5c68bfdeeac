use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, CONTROLS};
use actix_web::{web, HttpResponse};
use common::requests::DeleteControlRequest;
use common::ErrorBody;
use log::info;

/// `POST /api/controls/delete`.
pub async fn process(
    store: web::Data<DocumentStore>,
    payload: web::Json<DeleteControlRequest>,
) -> Result<HttpResponse, ServiceError> {
    let id = payload.into_inner().id;
    if id.trim().is_empty() {
        return Err(ServiceError::BadRequest("Control ID is required".to_string()));
    }

    let store = store.get_ref().clone();
    let target = id.clone();
    let removed = blocking("Failed to delete control", move || {
        store.delete(CONTROLS, &target)
    })
    .await?;

    if !removed {
        return Err(ServiceError::NotFound(format!("Control {id} not found")));
    }
    info!("deleted control {id}");
    Ok(HttpResponse::Ok().json(ErrorBody::new("Control deleted successfully")))
}
