//! Component state for the controls board.
//!
//! The `ListStore` holds the data and every optimistic change. What lives here
//! besides it is presentation only: view mode, filters, form inputs, collapsed
//! timeline sections and the drag in progress.

use super::form::ControlForm;
use super::helpers::show_toast;
use crate::api::HttpControlsApi;
use common::model::Control;
use common::store::{Change, ListStore};
use common::views::{ControlFilters, GroupBy, TimelineBucket};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Kanban,
    Timeline,
}

impl ViewMode {
    /// Only the kanban board has an order users can change; timeline sections
    /// follow the due dates.
    pub fn accepts_drops(self) -> bool {
        self == ViewMode::Kanban
    }
}

/// How much of each card is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Density {
    Compact,
    #[default]
    Medium,
    Full,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Compact, Density::Medium, Density::Full];

    pub fn label(&self) -> &'static str {
        match self {
            Density::Compact => "Compact",
            Density::Medium => "Medium",
            Density::Full => "Full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchField {
    Status,
    Assignee,
    DueDate,
}

/// Inputs of the batch toolbar. Empty means "leave unchanged"; the assignee
/// select also offers an explicit unassign entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchForm {
    pub status: String,
    pub assignee: String,
    pub due_date: String,
}

/// Technician whose name is being edited inline.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameDraft {
    pub id: String,
    pub name: String,
}

pub struct ControlsBoard {
    pub store: ListStore,
    pub api: HttpControlsApi,
    pub view_mode: ViewMode,
    pub density: Density,
    pub group_by: GroupBy,
    pub collapsed: BTreeSet<TimelineBucket>,
    pub filters: ControlFilters,
    pub add_form: ControlForm,
    pub bulk_text: String,
    pub bulk_error: Option<String>,
    pub batch: BatchForm,
    pub technicians_open: bool,
    pub renaming: Option<RenameDraft>,
    pub dragging: Option<String>,
    pub drag_over: Option<String>,
    pub loaded: bool,
}

impl ControlsBoard {
    pub fn new() -> Self {
        let mut store = ListStore::new();
        store.subscribe(|change| {
            if let Change::Failed(message) = change {
                gloo_console::error!(message.clone());
                show_toast(message);
            }
        });

        Self {
            store,
            api: HttpControlsApi,
            view_mode: ViewMode::default(),
            density: Density::default(),
            group_by: GroupBy::default(),
            collapsed: BTreeSet::new(),
            filters: ControlFilters::default(),
            add_form: ControlForm::default(),
            bulk_text: String::new(),
            bulk_error: None,
            batch: BatchForm::default(),
            technicians_open: false,
            renaming: None,
            dragging: None,
            drag_over: None,
            loaded: false,
        }
    }

    /// Controls passing the current filters, in display order.
    pub fn visible(&self) -> Vec<&Control> {
        self.filters.apply(self.store.controls())
    }

    /// `order` for a control appended at the end of the list.
    pub fn next_order(&self) -> i64 {
        self.store
            .controls()
            .iter()
            .map(|c| c.order + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_kanban_board_takes_drops() {
        assert!(ViewMode::Kanban.accepts_drops());
        assert!(!ViewMode::Timeline.accepts_drops());
    }
}
