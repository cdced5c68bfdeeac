//! Operations that have been applied locally and wait for the server.
//!
//! Each value owns the request to send and what is needed to undo the local
//! change. They are consumed by the matching `ListStore::settle_*` method.

use crate::model::{Control, ControlDraft, ControlPatch, Technician};
use crate::requests::{
    DeleteControlRequest, RenameTechnicianRequest, ReorderRequest, UpdateControlRequest,
};

#[derive(Debug, Clone)]
#[must_use = "a pending add must be settled"]
pub struct PendingAdd {
    pub(super) temp_id: String,
    pub(super) request: ControlDraft,
}

impl PendingAdd {
    pub fn temp_id(&self) -> &str {
        &self.temp_id
    }

    pub fn request(&self) -> &ControlDraft {
        &self.request
    }
}

#[derive(Debug, Clone)]
#[must_use = "a pending bulk add must be settled"]
pub struct PendingAddMany {
    pub(super) temp_ids: Vec<String>,
    pub(super) requests: Vec<ControlDraft>,
}

impl PendingAddMany {
    pub fn temp_ids(&self) -> &[String] {
        &self.temp_ids
    }

    /// Drafts in submission order.
    pub fn requests(&self) -> &[ControlDraft] {
        &self.requests
    }
}

#[derive(Debug, Clone)]
#[must_use = "a pending update must be settled"]
pub struct PendingUpdate {
    /// Restores the touched fields only; see [`ControlPatch::reverting`].
    pub(super) revert: ControlPatch,
    pub(super) request: UpdateControlRequest,
}

impl PendingUpdate {
    pub fn id(&self) -> &str {
        &self.request.id
    }

    pub fn request(&self) -> &UpdateControlRequest {
        &self.request
    }
}

#[derive(Debug, Clone)]
#[must_use = "a pending delete must be settled"]
pub struct PendingDelete {
    pub(super) snapshot: Control,
    pub(super) request: DeleteControlRequest,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.request.id
    }

    pub fn request(&self) -> &DeleteControlRequest {
        &self.request
    }
}

/// A reorder keeps no snapshot: a failure is repaired by reloading.
#[derive(Debug, Clone)]
#[must_use = "a pending reorder must be settled"]
pub struct PendingReorder {
    pub(super) request: ReorderRequest,
}

impl PendingReorder {
    pub fn request(&self) -> &ReorderRequest {
        &self.request
    }
}

/// Independent updates sharing one patch. Not atomic across the set.
#[derive(Debug, Clone)]
#[must_use = "a pending batch update must be settled"]
pub struct PendingBatchUpdate {
    pub(super) updates: Vec<PendingUpdate>,
}

impl PendingBatchUpdate {
    pub fn updates(&self) -> &[PendingUpdate] {
        &self.updates
    }
}

#[derive(Debug, Clone)]
#[must_use = "a pending technician rename must be settled"]
pub struct PendingTechnicianRename {
    pub(super) snapshot: Technician,
    pub(super) request: RenameTechnicianRequest,
}

impl PendingTechnicianRename {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn request(&self) -> &RenameTechnicianRequest {
        &self.request
    }
}

#[derive(Debug, Clone)]
#[must_use = "a pending technician delete must be settled"]
pub struct PendingTechnicianDelete {
    pub(super) index: usize,
    pub(super) snapshot: Technician,
}

impl PendingTechnicianDelete {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }
}
