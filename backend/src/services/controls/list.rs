use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, CONTROLS};
use actix_web::{web, HttpResponse};
use common::model::Control;

/// `GET /api/controls`: every control, ascending `order`.
pub async fn process(store: web::Data<DocumentStore>) -> Result<HttpResponse, ServiceError> {
    let store = store.get_ref().clone();
    let controls = blocking("Failed to fetch controls", move || list_controls(&store)).await?;
    Ok(HttpResponse::Ok().json(controls))
}

pub fn list_controls(store: &DocumentStore) -> Result<Vec<Control>, String> {
    let mut controls: Vec<Control> = store.list(CONTROLS)?;
    controls.sort_by_key(|c| c.order);
    Ok(controls)
}
