//! Field state of the "Add Control" sheet.

use super::helpers::due_from_input;
use chrono::TimeZone;
use common::model::{Company, ControlDraft, ControlStatus, PriorityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DcfId,
    Title,
    Explanation,
    Status,
    Priority,
    Assignee,
    DueDate,
    Tags,
    ExternalUrl,
    TicketNumber,
    TicketUrl,
    Company,
}

/// Raw input values, kept as typed until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlForm {
    pub dcf_id: String,
    pub title: String,
    pub explanation: String,
    pub status: ControlStatus,
    pub priority: Option<PriorityLevel>,
    pub assignee_id: String,
    pub due_date: String,
    pub tags: String,
    pub external_url: String,
    pub ticket_number: String,
    pub ticket_url: String,
    pub company: Company,
    pub error: Option<String>,
}

impl ControlForm {
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::DcfId => self.dcf_id = value,
            FormField::Title => self.title = value,
            FormField::Explanation => self.explanation = value,
            FormField::Status => {
                self.status = ControlStatus::from_label(&value).unwrap_or_default()
            }
            FormField::Priority => {
                self.priority = PriorityLevel::ALL
                    .into_iter()
                    .find(|p| p.label() == value)
            }
            FormField::Assignee => self.assignee_id = value,
            FormField::DueDate => self.due_date = value,
            FormField::Tags => self.tags = value,
            FormField::ExternalUrl => self.external_url = value,
            FormField::TicketNumber => self.ticket_number = value,
            FormField::TicketUrl => self.ticket_url = value,
            FormField::Company => {
                self.company = Company::ALL
                    .into_iter()
                    .find(|c| c.label() == value)
                    .unwrap_or_default()
            }
        }
    }

    /// Builds the draft appended at position `order`, reading the due day in
    /// `zone`. Only the date is checked here; the remaining rules are applied
    /// by the store.
    pub fn to_draft<Tz: TimeZone>(&self, order: i64, zone: &Tz) -> Result<ControlDraft, String> {
        let due = match self.due_date.trim() {
            "" => None,
            raw => Some(due_from_input(raw, zone)?),
        };
        let optional = |value: &str| Some(value.to_string()).filter(|v| !v.trim().is_empty());

        Ok(ControlDraft {
            dcf_id: self.dcf_id.clone(),
            title: self.title.clone(),
            explanation: self.explanation.clone(),
            status: self.status,
            priority_level: self.priority,
            estimated_completion_date: due,
            assignee_id: optional(&self.assignee_id),
            order,
            tags: self.tags.split(',').map(str::to_string).collect(),
            external_url: optional(&self.external_url),
            company: self.company,
            ticket_number: optional(&self.ticket_number),
            ticket_url: optional(&self.ticket_url),
            ..ControlDraft::default()
        })
    }
}
