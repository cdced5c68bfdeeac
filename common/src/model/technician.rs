use serde::{Deserialize, Serialize};

/// A person controls can be assigned to. Controls only hold the id; names are
/// resolved with a lookup when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub agent_id: String,
}

/// Body of the technician create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub agent_id: String,
}

/// Finds a technician by id.
pub fn find<'a>(technicians: &'a [Technician], id: &str) -> Option<&'a Technician> {
    technicians.iter().find(|t| t.id == id)
}
