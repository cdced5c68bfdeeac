use crate::errors::ServiceError;
use crate::services::blocking;
use crate::storage::{DocumentStore, TECHNICIANS};
use actix_web::{web, HttpResponse};
use common::model::Technician;
use serde_json::Value;

/// `PUT /api/technicians/{id}`: only the name can change.
///
/// The body is read as raw JSON so that a missing or non-string `name` gets
/// the same 400 as an empty one.
pub async fn process(
    store: web::Data<DocumentStore>,
    id: web::Path<String>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let name = payload
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::BadRequest("Invalid technician name provided".to_string()))?;

    let store = store.get_ref().clone();
    let target = id.clone();
    let renamed = blocking(&format!("Failed to update technician {id}"), move || {
        let Some(mut technician) = store.get::<Technician>(TECHNICIANS, &target)? else {
            return Ok(None);
        };
        technician.name = name;
        store.put(TECHNICIANS, &target, &technician)?;
        Ok(Some(technician))
    })
    .await?;

    renamed
        .map(|technician| HttpResponse::Ok().json(technician))
        .ok_or_else(|| ServiceError::NotFound(format!("Technician {id} not found")))
}
