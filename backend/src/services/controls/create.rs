use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, CONTROLS};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::{Control, ControlDraft};
use log::info;
use uuid::Uuid;

/// `POST /api/controls`: validates the draft, stores it under a fresh id and
/// returns the stored control.
pub async fn process(
    store: web::Data<DocumentStore>,
    payload: web::Json<ControlDraft>,
) -> Result<HttpResponse, ServiceError> {
    let draft = payload.into_inner().validate().map_err(ServiceError::BadRequest)?;

    let mut control = Control::from_draft(Uuid::new_v4().to_string(), draft);
    control.last_updated = Some(Utc::now());

    let store = store.get_ref().clone();
    let saved = control.clone();
    blocking("Failed to add control", move || {
        store.put(CONTROLS, &saved.id, &saved)
    })
    .await?;

    info!("created control {} ({})", control.id, control.dcf_id);
    Ok(HttpResponse::Created().json(control))
}
