use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, TECHNICIANS};
use actix_web::{web, HttpResponse};
use common::model::{Technician, TechnicianDraft};
use log::info;
use uuid::Uuid;

/// `POST /api/technicians`.
pub async fn process(
    store: web::Data<DocumentStore>,
    payload: web::Json<TechnicianDraft>,
) -> Result<HttpResponse, ServiceError> {
    let draft = payload.into_inner();
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::BadRequest("Technician name is required".to_string()));
    }

    let technician = Technician {
        id: Uuid::new_v4().to_string(),
        name,
        email: draft.email.trim().to_string(),
        agent_id: draft.agent_id.trim().to_string(),
    };
    let store = store.get_ref().clone();
    let saved = technician.clone();
    blocking("Failed to add technician", move || {
        store.put(TECHNICIANS, &saved.id, &saved)
    })
    .await?;

    info!("created technician {}", technician.id);
    Ok(HttpResponse::Created().json(technician))
}
