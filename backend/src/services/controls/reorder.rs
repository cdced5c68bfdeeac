use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, Reorder};
use actix_web::{web, HttpResponse};
use common::requests::ReorderRequest;
use common::ErrorBody;
use log::{info, warn};

/// `POST /api/controls/update-order`: writes the whole batch or nothing.
pub async fn process(
    store: web::Data<DocumentStore>,
    payload: web::Json<ReorderRequest>,
) -> Result<HttpResponse, ServiceError> {
    let updates = payload.into_inner().updates;
    if updates.iter().any(|u| u.id.trim().is_empty()) {
        return Err(ServiceError::BadRequest("Invalid updates format".to_string()));
    }

    let store = store.get_ref().clone();
    let outcome = blocking("Failed to update control order", move || {
        store.reorder_controls(&updates)
    })
    .await?;

    match outcome {
        Reorder::Applied(count) => {
            info!("updated order of {count} controls");
            Ok(HttpResponse::Ok().json(ErrorBody::new("Order updated successfully")))
        }
        Reorder::Missing(id) => {
            warn!("order update rolled back, control {id} does not exist");
            Err(ServiceError::NotFound(format!("Control {id} not found")))
        }
    }
}
