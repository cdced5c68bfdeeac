//! Request bodies shared by the browser client and the API handlers.

use crate::model::ControlPatch;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/controls/update`: the id plus the fields to merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateControlRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: ControlPatch,
}

/// Body of `POST /api/controls/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteControlRequest {
    pub id: String,
}

/// One entry of a batch reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
}

/// Body of `POST /api/controls/update-order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub updates: Vec<OrderUpdate>,
}

/// Body of `PUT /api/technicians/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTechnicianRequest {
    #[serde(default)]
    pub name: String,
}
