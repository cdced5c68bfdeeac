//! HTTP API. Each resource lives in its own module and exposes a
//! `configure_routes` scope; handlers are one file per endpoint.

pub mod controls;
pub mod technicians;

use crate::errors::ServiceError;
use actix_web::web;

/// Registers every API scope. Shared by `main` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(controls::configure_routes())
        .service(technicians::configure_routes());
}

/// Runs a SQLite job on the blocking pool so the worker thread stays free.
///
/// `context` is the message the client sees if the job fails.
pub(crate) async fn blocking<T, F>(context: &str, job: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ServiceError::storage(context, e)),
        Err(e) => Err(ServiceError::storage(context, e)),
    }
}
