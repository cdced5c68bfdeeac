use super::pending::{PendingAdd, PendingAddMany, PendingBatchUpdate, PendingDelete, PendingUpdate};
use super::{Change, ListStore};
use crate::error::StoreError;
use crate::model::{Control, ControlDraft, ControlPatch};
use crate::requests::{DeleteControlRequest, UpdateControlRequest};
use std::collections::HashSet;

const BATCH_FAILURE_MESSAGE: &str = "Failed to perform batch update. Please try again.";

impl ListStore {
    /// Appends a placeholder for `draft` and closes the add form.
    ///
    /// A draft that fails validation is returned as an error and leaves the
    /// store untouched.
    pub fn begin_add(&mut self, draft: ControlDraft) -> Result<PendingAdd, StoreError> {
        let draft = draft.validate().map_err(StoreError::Validation)?;
        self.error = None;

        let temp_id = self.next_temp_id("temp");
        self.controls
            .push(Control::from_draft(temp_id.clone(), draft.clone()));
        self.add_form_open = false;
        self.notify(Change::ControlInserted(temp_id.clone()));
        self.notify(Change::FormsChanged);

        Ok(PendingAdd {
            temp_id,
            request: draft,
        })
    }

    /// Swaps the placeholder for the stored control, or removes it and reopens
    /// the add form.
    pub fn settle_add(
        &mut self,
        pending: PendingAdd,
        outcome: Result<Control, StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(saved) => {
                let id = saved.id.clone();
                let already_present = self.position(&id).is_some();
                match self.position(&pending.temp_id) {
                    Some(index) if !already_present => self.controls[index] = saved,
                    Some(index) => {
                        self.controls.remove(index);
                    }
                    None if !already_present => self.controls.push(saved),
                    None => {}
                }
                self.notify(Change::ControlReplaced {
                    temp_id: pending.temp_id,
                    id,
                });
                Ok(())
            }
            Err(err) => {
                log::error!("failed to add control: {err}");
                if let Some(index) = self.position(&pending.temp_id) {
                    self.controls.remove(index);
                    self.notify(Change::ControlRemoved(pending.temp_id));
                }
                self.add_form_open = true;
                self.notify(Change::FormsChanged);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Appends placeholders for every draft at once and closes the bulk form.
    /// Nothing is applied if any draft fails validation.
    pub fn begin_add_many(
        &mut self,
        drafts: Vec<ControlDraft>,
    ) -> Result<PendingAddMany, StoreError> {
        let requests = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|message| StoreError::Validation(format!("Row {}: {message}", index + 1)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.error = None;

        let mut temp_ids = Vec::with_capacity(requests.len());
        for draft in &requests {
            let temp_id = self.next_temp_id("temp-bulk");
            self.controls
                .push(Control::from_draft(temp_id.clone(), draft.clone()));
            temp_ids.push(temp_id);
        }
        self.bulk_add_form_open = false;
        for temp_id in &temp_ids {
            self.notify(Change::ControlInserted(temp_id.clone()));
        }
        self.notify(Change::FormsChanged);

        Ok(PendingAddMany { temp_ids, requests })
    }

    /// Removes every placeholder and appends the controls that were stored, in
    /// submission order. Failed drafts are logged and dropped.
    ///
    /// Returns how many controls were created.
    pub fn settle_add_many(
        &mut self,
        pending: PendingAddMany,
        outcomes: Vec<Result<Control, StoreError>>,
    ) -> usize {
        let temp_ids: HashSet<&str> = pending.temp_ids.iter().map(String::as_str).collect();
        self.controls.retain(|c| !temp_ids.contains(c.id.as_str()));

        let mut created = 0;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(saved) => {
                    if self.position(&saved.id).is_none() {
                        self.controls.push(saved);
                    }
                    created += 1;
                }
                Err(err) => log::error!("error adding control {}: {err}", index + 1),
            }
        }
        log::info!(
            "bulk add stored {created} of {} controls",
            pending.requests.len()
        );
        for temp_id in pending.temp_ids {
            self.notify(Change::ControlRemoved(temp_id));
        }
        self.notify(Change::Loaded);
        created
    }

    /// Merges `patch` into the control with `id`.
    ///
    /// Returns `Ok(None)` when no such control exists. Dates are normalized
    /// before anything changes, so a bad date leaves the store untouched.
    pub fn begin_update(
        &mut self,
        id: &str,
        mut patch: ControlPatch,
    ) -> Result<Option<PendingUpdate>, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        patch.normalize().map_err(StoreError::Validation)?;
        self.error = None;

        let revert = patch.reverting(&self.controls[index]);
        patch.apply_to(&mut self.controls[index]);
        self.notify(Change::ControlChanged(id.to_string()));

        Ok(Some(PendingUpdate {
            revert,
            request: UpdateControlRequest {
                id: id.to_string(),
                patch,
            },
        }))
    }

    /// Keeps the merged control on success. Otherwise puts back the fields the
    /// patch changed; a reorder that settled meanwhile keeps its `order`.
    pub fn settle_update(
        &mut self,
        pending: PendingUpdate,
        outcome: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                log::error!("failed to update control {}: {err}", pending.request.id);
                if let Some(index) = self.position(&pending.request.id) {
                    pending.revert.apply_to(&mut self.controls[index]);
                    self.notify(Change::ControlChanged(pending.request.id));
                }
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Removes the control with `id`. Returns `None` when it does not exist.
    /// Remaining controls keep their `order` values.
    pub fn begin_delete(&mut self, id: &str) -> Option<PendingDelete> {
        let index = self.position(id)?;
        self.error = None;
        let snapshot = self.controls.remove(index);
        self.notify(Change::ControlRemoved(id.to_string()));
        Some(PendingDelete {
            snapshot,
            request: DeleteControlRequest { id: id.to_string() },
        })
    }

    /// Puts the control back where it was if the server refused the delete.
    pub fn settle_delete(
        &mut self,
        pending: PendingDelete,
        outcome: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(()) => {
                if self.selection.remove(&pending.request.id) {
                    self.notify(Change::SelectionChanged);
                }
                Ok(())
            }
            Err(err) => {
                log::error!("failed to delete control {}: {err}", pending.request.id);
                if self.position(&pending.request.id).is_none() {
                    let index = self.reinsert_index(&pending);
                    self.controls.insert(index, pending.snapshot);
                    self.notify(Change::ControlInserted(pending.request.id));
                }
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// A control whose delete was refused goes back after every control with an
    /// equal or lower `order`, which is where a reload would show it.
    fn reinsert_index(&self, pending: &PendingDelete) -> usize {
        let order = pending.snapshot.order;
        self.controls
            .iter()
            .position(|c| c.order > order)
            .unwrap_or(self.controls.len())
    }

    /// Starts one independent update per id. Unknown ids are skipped.
    pub fn begin_batch_update<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a str>,
        mut patch: ControlPatch,
    ) -> Result<PendingBatchUpdate, StoreError> {
        patch.normalize().map_err(StoreError::Validation)?;
        let mut updates = Vec::new();
        for id in ids {
            if let Some(update) = self.begin_update(id, patch.clone())? {
                updates.push(update);
            }
        }
        Ok(PendingBatchUpdate { updates })
    }

    /// Settles every update on its own, then clears the selection whatever the
    /// outcome. `outcomes` lines up with [`PendingBatchUpdate::updates`].
    pub fn settle_batch_update(
        &mut self,
        pending: PendingBatchUpdate,
        outcomes: Vec<Result<(), StoreError>>,
    ) {
        let total = pending.updates.len();
        let mut failed = 0;
        let mut outcomes = outcomes.into_iter();
        for update in pending.updates {
            let outcome = outcomes
                .next()
                .unwrap_or_else(|| Err(StoreError::Transport("no response received".to_string())));
            if self.settle_update(update, outcome).is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            log::error!("batch update failed for {failed} of {total} controls");
            self.fail(&StoreError::Transport(BATCH_FAILURE_MESSAGE.to_string()));
        } else {
            log::info!("batch update applied to {total} controls");
        }
        self.clear_selection();
    }
}
