use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, CONTROLS};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::Control;
use common::requests::UpdateControlRequest;

/// `POST /api/controls/update`: merges the patch into the stored control.
///
/// Only the fields present in the body change. Dates may arrive in any of the
/// accepted shapes and are stored normalized.
pub async fn process(
    store: web::Data<DocumentStore>,
    payload: web::Json<UpdateControlRequest>,
) -> Result<HttpResponse, ServiceError> {
    let UpdateControlRequest { id, mut patch } = payload.into_inner();
    if id.trim().is_empty() {
        return Err(ServiceError::BadRequest("Control ID is required".to_string()));
    }
    patch.normalize().map_err(ServiceError::BadRequest)?;

    let store = store.get_ref().clone();
    let lookup_id = id.clone();
    let updated = blocking("Failed to update control", move || {
        let Some(mut control) = store.get::<Control>(CONTROLS, &lookup_id)? else {
            return Ok(None);
        };
        patch.apply_to(&mut control);
        control.last_updated = Some(Utc::now());
        store.put(CONTROLS, &lookup_id, &control)?;
        Ok(Some(control))
    })
    .await?;

    match updated {
        Some(control) => Ok(HttpResponse::Ok().json(control)),
        None => Err(ServiceError::NotFound(format!("Control {id} not found"))),
    }
}
