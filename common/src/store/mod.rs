//! Client-side state for one browser session.
//!
//! `ListStore` is the only writer of the control and technician collections.
//! Views read from it and forward user intents back to it.
//!
//! Every mutation is optimistic and split in three steps so that no borrow of
//! the store is held while a request is in flight:
//!
//! 1. `begin_*` validates, snapshots whatever it is about to change, applies the
//!    change locally and returns a `Pending*` value holding the wire request and
//!    the snapshot;
//! 2. the caller sends the request through a [`ControlsApi`];
//! 3. `settle_*` receives the pending value together with the outcome and either
//!    commits or restores the snapshot.
//!
//! Several operations may be pending at once, each carrying its own snapshot.
//! A rejected update only reverts the fields it patched, so a reorder that was
//! saved while it was in flight keeps its `order` values.
//! Operations racing on the same control are not coordinated; whichever settles
//! last wins. [`Session`] strings the three steps together for callers that do
//! not need overlapping requests.

mod api;
mod controls;
mod pending;
mod reorder;
mod session;
mod technicians;

#[cfg(test)]
mod testing;

pub use api::{ControlsApi, fetch_all, submit_sequentially};
pub use pending::{
    PendingAdd, PendingAddMany, PendingBatchUpdate, PendingDelete, PendingReorder,
    PendingTechnicianDelete, PendingTechnicianRename, PendingUpdate,
};
pub use reorder::{relocate, renumber};
pub use session::Session;

use crate::error::StoreError;
use crate::model::{Control, Technician};
use chrono::Utc;
use std::collections::BTreeSet;

/// What changed, sent to subscribers after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Loading,
    Loaded,
    ControlInserted(String),
    ControlReplaced { temp_id: String, id: String },
    ControlChanged(String),
    ControlRemoved(String),
    Reordered,
    TechniciansChanged,
    SelectionChanged,
    FormsChanged,
    Failed(String),
}

/// Handle returned by [`ListStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Change)>;

pub struct ListStore {
    controls: Vec<Control>,
    technicians: Vec<Technician>,
    selection: BTreeSet<String>,
    add_form_open: bool,
    bulk_add_form_open: bool,
    loading: bool,
    error: Option<String>,
    needs_resync: bool,
    temp_seq: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListStore {
    pub fn new() -> Self {
        Self {
            controls: Vec::new(),
            technicians: Vec::new(),
            selection: BTreeSet::new(),
            add_form_open: false,
            bulk_add_form_open: false,
            loading: false,
            error: None,
            needs_resync: false,
            temp_seq: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Starts with an already fetched state. Controls are put in display order.
    pub fn with_state(controls: Vec<Control>, technicians: Vec<Technician>) -> Self {
        let mut store = Self::new();
        store.replace_state(controls, technicians);
        store
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn technicians(&self) -> &[Technician] {
        &self.technicians
    }

    pub fn technician(&self, id: &str) -> Option<&Technician> {
        self.technicians.iter().find(|t| t.id == id)
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn add_form_open(&self) -> bool {
        self.add_form_open
    }

    pub fn bulk_add_form_open(&self) -> bool {
        self.bulk_add_form_open
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set after a failed reorder; cleared by the next successful load.
    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Change) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn set_add_form_open(&mut self, open: bool) {
        if self.add_form_open != open {
            self.add_form_open = open;
            self.notify(Change::FormsChanged);
        }
    }

    pub fn set_bulk_add_form_open(&mut self, open: bool) {
        if self.bulk_add_form_open != open {
            self.bulk_add_form_open = open;
            self.notify(Change::FormsChanged);
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) {
            if self.control(id).is_none() {
                return;
            }
            self.selection.insert(id.to_string());
        }
        self.notify(Change::SelectionChanged);
    }

    /// Replaces the selection with the given ids, ignoring unknown ones.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.controls.iter().any(|c| c.id == *id))
            .map(str::to_string)
            .collect();
        self.notify(Change::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify(Change::SelectionChanged);
    }

    /// Marks a full fetch as in flight.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
        self.notify(Change::Loading);
    }

    /// Applies the result of a full fetch. Nothing of a failed fetch is kept.
    pub fn settle_load(
        &mut self,
        outcome: Result<(Vec<Control>, Vec<Technician>), StoreError>,
    ) -> Result<(), StoreError> {
        self.loading = false;
        match outcome {
            Ok((controls, technicians)) => {
                log::info!(
                    "loaded {} controls and {} technicians",
                    controls.len(),
                    technicians.len()
                );
                self.replace_state(controls, technicians);
                self.needs_resync = false;
                self.notify(Change::Loaded);
                Ok(())
            }
            Err(err) => {
                log::error!("failed to load data: {err}");
                self.controls.clear();
                self.technicians.clear();
                self.selection.clear();
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn replace_state(&mut self, mut controls: Vec<Control>, technicians: Vec<Technician>) {
        controls.sort_by_key(|c| c.order);
        self.controls = controls;
        self.technicians = technicians;
        let known: BTreeSet<&str> = self.controls.iter().map(|c| c.id.as_str()).collect();
        self.selection.retain(|id| known.contains(id.as_str()));
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.id == id)
    }

    fn next_temp_id(&mut self, prefix: &str) -> String {
        self.temp_seq += 1;
        format!("{prefix}-{}-{}", Utc::now().timestamp_millis(), self.temp_seq)
    }

    fn fail(&mut self, err: &StoreError) {
        let message = err.to_string();
        self.error = Some(message.clone());
        self.notify(Change::Failed(message));
    }

    fn notify(&self, change: Change) {
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

/// Whether `id` is a client-side placeholder for an unsaved control.
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with("temp-")
}
