use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::ErrorBody;
use log::error;
use thiserror::Error;

/// Failure of an API handler. Always rendered as `{ "message": ... }`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    /// Logs the underlying cause and keeps only `message` for the client.
    pub fn storage(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let message = message.into();
        error!("{message}: {cause}");
        ServiceError::Storage(message)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn renders_message_body_with_status() {
        let response = ServiceError::NotFound("Control c1 not found".into()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.message, "Control c1 not found");
    }

    #[test]
    fn storage_errors_hide_the_cause() {
        let err = ServiceError::storage("Failed to fetch controls", "disk I/O error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch controls");
    }
}
