//! Browser implementation of the store's HTTP seam, on top of `gloo-net`.

use common::model::{Control, ControlDraft, Technician};
use common::requests::{
    DeleteControlRequest, RenameTechnicianRequest, ReorderRequest, UpdateControlRequest,
};
use common::store::ControlsApi;
use common::StoreError;
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

const CONTROLS: &str = "/api/controls";
const TECHNICIANS: &str = "/api/technicians";

/// Stateless client for the backend served from the same origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HttpControlsApi;

async fn send(builder: RequestBuilder, action: &str) -> Result<Response, StoreError> {
    let response = builder
        .send()
        .await
        .map_err(|e| StoreError::Transport(format!("Failed to {action}: {e}")))?;
    check(response, action).await
}

async fn send_json<B: Serialize>(
    builder: RequestBuilder,
    body: &B,
    action: &str,
) -> Result<Response, StoreError> {
    let request = builder
        .json(body)
        .map_err(|e| StoreError::Transport(format!("Failed to {action}: {e}")))?;
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::Transport(format!("Failed to {action}: {e}")))?;
    check(response, action).await
}

async fn check(response: Response, action: &str) -> Result<Response, StoreError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::from_response(status, &status_text, &body, action))
}

async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> Result<T, StoreError> {
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Decode(format!("Failed to {action}: {e}")))
}

impl ControlsApi for HttpControlsApi {
    async fn list_controls(&self) -> Result<Vec<Control>, StoreError> {
        let action = "fetch controls";
        decode(send(gloo_net::http::Request::get(CONTROLS), action).await?, action).await
    }

    async fn list_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        let action = "fetch technicians";
        decode(send(gloo_net::http::Request::get(TECHNICIANS), action).await?, action).await
    }

    async fn create_control(&self, draft: &ControlDraft) -> Result<Control, StoreError> {
        let action = "add control";
        let response = send_json(gloo_net::http::Request::post(CONTROLS), draft, action).await?;
        decode(response, action).await
    }

    async fn update_control(&self, request: &UpdateControlRequest) -> Result<Control, StoreError> {
        let action = "update control";
        let url = format!("{CONTROLS}/update");
        let response = send_json(gloo_net::http::Request::post(&url), request, action).await?;
        decode(response, action).await
    }

    async fn delete_control(&self, request: &DeleteControlRequest) -> Result<(), StoreError> {
        let url = format!("{CONTROLS}/delete");
        send_json(gloo_net::http::Request::post(&url), request, "delete control").await?;
        Ok(())
    }

    async fn reorder_controls(&self, request: &ReorderRequest) -> Result<(), StoreError> {
        let url = format!("{CONTROLS}/update-order");
        send_json(gloo_net::http::Request::post(&url), request, "save new order").await?;
        Ok(())
    }

    async fn rename_technician(
        &self,
        id: &str,
        request: &RenameTechnicianRequest,
    ) -> Result<Technician, StoreError> {
        let action = "update technician";
        let url = format!("{TECHNICIANS}/{id}");
        let response = send_json(gloo_net::http::Request::put(&url), request, action).await?;
        decode(response, action).await
    }

    async fn delete_technician(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{TECHNICIANS}/{id}");
        send(gloo_net::http::Request::delete(&url), "delete technician").await?;
        Ok(())
    }
}

/// URL of the HTML report download.
pub fn extract_url() -> String {
    format!("{CONTROLS}/extract")
}
