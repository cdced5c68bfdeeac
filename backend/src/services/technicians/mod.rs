//! Routes under `/api/technicians`.
//!
//! - `GET /`: list, sorted by name.
//! - `POST /`: create from `{name, email, agentId}`.
//! - `PUT /{id}`: rename.
//! - `DELETE /{id}`: delete without touching assigned controls.

mod create;
mod delete;
mod list;
mod rename;

use actix_web::web::{self, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/technicians";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{id}", put().to(rename::process))
        .route("/{id}", web::delete().to(delete::process))
}
