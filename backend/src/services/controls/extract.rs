use crate::errors::ServiceError;
use crate::report::render_report;
use crate::services::blocking;
use crate::storage::{DocumentStore, TECHNICIANS};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Local;
use common::model::Technician;

const FILE_NAME: &str = "controls-export.html";

/// `GET /api/controls/extract`: the HTML report as a download.
pub async fn process(store: web::Data<DocumentStore>) -> Result<HttpResponse, ServiceError> {
    let store = store.get_ref().clone();
    let (controls, technicians) = blocking("Failed to generate extract", move || {
        let controls = super::list::list_controls(&store)?;
        let technicians: Vec<Technician> = store.list(TECHNICIANS)?;
        Ok((controls, technicians))
    })
    .await?;

    let html = render_report(&controls, &technicians, Local::now().naive_local());
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(FILE_NAME.to_string())],
        })
        .body(html))
}
