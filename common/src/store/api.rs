use crate::error::StoreError;
use crate::model::{Control, ControlDraft, Technician};
use crate::requests::{
    DeleteControlRequest, RenameTechnicianRequest, ReorderRequest, UpdateControlRequest,
};
use futures_util::future;

/// The HTTP surface the store depends on.
///
/// Implementations turn non-success responses into [`StoreError::Http`] via
/// [`StoreError::from_response`]. The browser implementation is single
/// threaded, so the returned futures are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ControlsApi {
    async fn list_controls(&self) -> Result<Vec<Control>, StoreError>;

    async fn list_technicians(&self) -> Result<Vec<Technician>, StoreError>;

    async fn create_control(&self, draft: &ControlDraft) -> Result<Control, StoreError>;

    async fn update_control(&self, request: &UpdateControlRequest) -> Result<Control, StoreError>;

    async fn delete_control(&self, request: &DeleteControlRequest) -> Result<(), StoreError>;

    async fn reorder_controls(&self, request: &ReorderRequest) -> Result<(), StoreError>;

    async fn rename_technician(
        &self,
        id: &str,
        request: &RenameTechnicianRequest,
    ) -> Result<Technician, StoreError>;

    async fn delete_technician(&self, id: &str) -> Result<(), StoreError>;
}

/// Fetches both collections concurrently.
pub async fn fetch_all<A: ControlsApi>(
    api: &A,
) -> Result<(Vec<Control>, Vec<Technician>), StoreError> {
    let (controls, technicians) = future::join(api.list_controls(), api.list_technicians()).await;
    Ok((controls?, technicians?))
}

/// Creates drafts one after the other so the server sees them in order.
/// A failure does not stop the remaining drafts.
pub async fn submit_sequentially<A: ControlsApi>(
    api: &A,
    drafts: &[ControlDraft],
) -> Vec<Result<Control, StoreError>> {
    let mut outcomes = Vec::with_capacity(drafts.len());
    for draft in drafts {
        outcomes.push(api.create_control(draft).await);
    }
    outcomes
}
