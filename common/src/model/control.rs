use crate::model::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Workflow state of a control. The wire form is the human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum ControlStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Complete,
}

impl ControlStatus {
    /// Kanban column order.
    pub const ALL: [ControlStatus; 3] = [
        ControlStatus::InProgress,
        ControlStatus::InReview,
        ControlStatus::Complete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ControlStatus::InProgress => "In Progress",
            ControlStatus::InReview => "In Review",
            ControlStatus::Complete => "Complete",
        }
    }

    /// Accepts both the label and the variant spelling, case-insensitively.
    pub fn from_label(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "inprogress" => Some(ControlStatus::InProgress),
            "inreview" => Some(ControlStatus::InReview),
            "complete" | "completed" => Some(ControlStatus::Complete),
            _ => None,
        }
    }
}

// Older documents carry statuses that no longer exist; they are treated as
// still open rather than rejected.
impl<'de> Deserialize<'de> for ControlStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(ControlStatus::from_label(&raw).unwrap_or_else(|| {
            log::warn!("unknown control status {raw:?}, treating it as In Progress");
            ControlStatus::InProgress
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
        PriorityLevel::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::Critical => "Critical",
        }
    }
}

/// Company a control applies to. Documents without the field belong to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "BGC")]
    Bgc,
    Cambio,
    #[default]
    Both,
}

impl Company {
    pub const ALL: [Company; 3] = [Company::Bgc, Company::Cambio, Company::Both];

    pub fn label(&self) -> &'static str {
        match self {
            Company::Bgc => "BGC",
            Company::Cambio => "Cambio",
            Company::Both => "Both",
        }
    }
}

/// One compliance item.
///
/// `order` defines the display sequence. It is not required to be unique or
/// contiguous at rest; ties keep their relative position because every sort over
/// it is stable. Dates are normalized on ingress, see [`timestamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: String,
    #[serde(default)]
    pub dcf_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub status: ControlStatus,
    #[serde(default)]
    pub priority_level: Option<PriorityLevel>,
    #[serde(default, with = "timestamp::optional")]
    pub estimated_completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, with = "timestamp::optional")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
}

impl Control {
    /// Materializes a draft under the given id.
    pub fn from_draft(id: impl Into<String>, draft: ControlDraft) -> Self {
        Self {
            id: id.into(),
            dcf_id: draft.dcf_id,
            title: draft.title,
            explanation: draft.explanation,
            status: draft.status,
            priority_level: draft.priority_level,
            estimated_completion_date: draft.estimated_completion_date,
            assignee_id: draft.assignee_id,
            order: draft.order,
            tags: draft.tags,
            progress: draft.progress,
            last_updated: draft.last_updated,
            external_url: draft.external_url,
            company: draft.company,
            ticket_number: draft.ticket_number,
            ticket_url: draft.ticket_url,
        }
    }

    /// `assignee_id`, with the empty string some forms submit read as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A control that has not been persisted yet. This is also the body of the
/// create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDraft {
    #[serde(default)]
    pub dcf_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub status: ControlStatus,
    #[serde(default)]
    pub priority_level: Option<PriorityLevel>,
    #[serde(default, with = "timestamp::optional")]
    pub estimated_completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, with = "timestamp::optional")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
}

impl ControlDraft {
    pub fn new(dcf_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            dcf_id: dcf_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks required fields and normalizes free-form input.
    ///
    /// Identifier and title are trimmed and must not be empty, progress is a
    /// percentage, tags lose blanks and duplicates, blank optional strings become
    /// `None`, and links typed without a scheme are assumed to be https.
    pub fn validate(mut self) -> Result<Self, String> {
        self.dcf_id = self.dcf_id.trim().to_string();
        self.title = self.title.trim().to_string();
        self.explanation = self.explanation.trim().to_string();
        if self.dcf_id.is_empty() || self.title.is_empty() {
            return Err("DCF ID and Title are required.".to_string());
        }
        if self.progress > 100 {
            return Err(format!(
                "Progress must be between 0 and 100, got {}.",
                self.progress
            ));
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.drain(..) {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        self.tags = tags;

        self.assignee_id = non_blank(self.assignee_id);
        self.ticket_number = non_blank(self.ticket_number);
        self.external_url = non_blank(self.external_url).map(with_scheme);
        self.ticket_url = non_blank(self.ticket_url).map(with_scheme);
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Prefixes `https://` when the user typed a bare host.
pub fn with_scheme(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{url}")
    }
}
