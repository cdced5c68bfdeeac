//! Partial updates with merge semantics.
//!
//! A field left at `None` is not touched. Nullable fields use a second `Option`
//! layer so that `Some(None)` (sent as JSON `null`) clears them.

use crate::model::control::{with_scheme, Company, Control, ControlStatus, PriorityLevel};
use crate::model::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A due date as it arrives from a form or the wire, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    At(DateTime<Utc>),
    Text(String),
}

impl DateInput {
    pub fn normalized(&self) -> Result<DateTime<Utc>, String> {
        match self {
            DateInput::At(instant) => Ok(*instant),
            DateInput::Text(text) => timestamp::parse_due_date(text),
        }
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        DateInput::At(instant)
    }
}

impl Serialize for DateInput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DateInput::At(instant) => serializer.serialize_str(&timestamp::to_wire(instant)),
            DateInput::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for DateInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match timestamp::from_wire(&value) {
            Some(instant) => DateInput::At(instant),
            None => match value {
                Value::String(text) => DateInput::Text(text),
                other => DateInput::Text(other.to_string()),
            },
        })
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcf_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ControlStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub priority_level: Option<Option<PriorityLevel>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub estimated_completion_date: Option<Option<DateInput>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub external_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub ticket_number: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub ticket_url: Option<Option<String>>,
}

impl ControlPatch {
    pub fn status(status: ControlStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn assignee(assignee_id: Option<String>) -> Self {
        Self {
            assignee_id: Some(assignee_id),
            ..Self::default()
        }
    }

    pub fn due_date(input: Option<DateInput>) -> Self {
        Self {
            estimated_completion_date: Some(input),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolves every textual date into an instant and rejects values that
    /// cannot be sent to the server. Must run before [`ControlPatch::apply_to`].
    pub fn normalize(&mut self) -> Result<(), String> {
        if let Some(Some(input)) = &mut self.estimated_completion_date {
            let instant = input.normalized()?;
            *input = DateInput::At(instant);
        }
        if let Some(progress) = self.progress {
            if progress > 100 {
                return Err(format!(
                    "Progress must be between 0 and 100, got {progress}."
                ));
            }
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("Title cannot be empty.".to_string());
            }
        }
        if let Some(Some(url)) = &mut self.external_url {
            *url = with_scheme(std::mem::take(url));
        }
        if let Some(Some(url)) = &mut self.ticket_url {
            *url = with_scheme(std::mem::take(url));
        }
        Ok(())
    }

    /// The patch that puts back what `self` would change in `before`. Fields
    /// `self` leaves alone stay unset, so other edits made in the meantime
    /// survive a rollback.
    pub fn reverting(&self, before: &Control) -> ControlPatch {
        ControlPatch {
            dcf_id: self.dcf_id.is_some().then(|| before.dcf_id.clone()),
            title: self.title.is_some().then(|| before.title.clone()),
            explanation: self.explanation.is_some().then(|| before.explanation.clone()),
            status: self.status.is_some().then(|| before.status),
            priority_level: self.priority_level.is_some().then(|| before.priority_level),
            estimated_completion_date: self
                .estimated_completion_date
                .is_some()
                .then(|| before.estimated_completion_date.map(DateInput::At)),
            assignee_id: self.assignee_id.is_some().then(|| before.assignee_id.clone()),
            order: self.order.is_some().then(|| before.order),
            tags: self.tags.is_some().then(|| before.tags.clone()),
            progress: self.progress.is_some().then(|| before.progress),
            external_url: self.external_url.is_some().then(|| before.external_url.clone()),
            company: self.company.is_some().then(|| before.company),
            ticket_number: self.ticket_number.is_some().then(|| before.ticket_number.clone()),
            ticket_url: self.ticket_url.is_some().then(|| before.ticket_url.clone()),
        }
    }

    /// Merges the set fields into `control`.
    pub fn apply_to(&self, control: &mut Control) {
        if let Some(dcf_id) = &self.dcf_id {
            control.dcf_id = dcf_id.clone();
        }
        if let Some(title) = &self.title {
            control.title = title.clone();
        }
        if let Some(explanation) = &self.explanation {
            control.explanation = explanation.clone();
        }
        if let Some(status) = self.status {
            control.status = status;
        }
        if let Some(priority) = self.priority_level {
            control.priority_level = priority;
        }
        match &self.estimated_completion_date {
            Some(Some(input)) => {
                if let Ok(instant) = input.normalized() {
                    control.estimated_completion_date = Some(instant);
                }
            }
            Some(None) => control.estimated_completion_date = None,
            None => {}
        }
        if let Some(assignee) = &self.assignee_id {
            control.assignee_id = assignee.clone();
        }
        if let Some(order) = self.order {
            control.order = order;
        }
        if let Some(tags) = &self.tags {
            control.tags = tags.clone();
        }
        if let Some(progress) = self.progress {
            control.progress = progress;
        }
        if let Some(url) = &self.external_url {
            control.external_url = url.clone();
        }
        if let Some(company) = self.company {
            control.company = company;
        }
        if let Some(number) = &self.ticket_number {
            control.ticket_number = number.clone();
        }
        if let Some(url) = &self.ticket_url {
            control.ticket_url = url.clone();
        }
    }
}
