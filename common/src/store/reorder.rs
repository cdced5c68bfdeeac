use super::pending::PendingReorder;
use super::{Change, ListStore};
use crate::error::StoreError;
use crate::model::Control;
use crate::requests::{OrderUpdate, ReorderRequest};

/// Moves the element at `from` so that it ends up at index `to`, shifting the
/// elements in between by one. Out-of-range indices leave `items` unchanged.
pub fn relocate<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Sets every `order` to the control's index.
pub fn renumber(controls: &mut [Control]) {
    for (index, control) in controls.iter_mut().enumerate() {
        control.order = index as i64;
    }
}

impl ListStore {
    /// Drops `moved_id` onto the position of `target_id` and renumbers the whole
    /// collection. Returns `None` when either id is unknown or both are the same.
    pub fn begin_reorder(&mut self, moved_id: &str, target_id: &str) -> Option<PendingReorder> {
        if moved_id == target_id {
            return None;
        }
        let (Some(from), Some(to)) = (self.position(moved_id), self.position(target_id)) else {
            log::warn!("could not find dragged controls {moved_id} / {target_id}");
            return None;
        };
        self.error = None;

        relocate(&mut self.controls, from, to);
        renumber(&mut self.controls);
        self.notify(Change::Reordered);

        let updates = self
            .controls
            .iter()
            .map(|c| OrderUpdate {
                id: c.id.clone(),
                order: c.order,
            })
            .collect();
        Some(PendingReorder {
            request: ReorderRequest { updates },
        })
    }

    /// The local order is kept either way. A failure flags the store for a full
    /// reload because the server may have applied part of the batch.
    pub fn settle_reorder(
        &mut self,
        _pending: PendingReorder,
        outcome: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(()) => {
                log::debug!("control order saved");
                Ok(())
            }
            Err(err) => {
                log::error!("failed to save new order: {err}");
                self.needs_resync = true;
                let surfaced = StoreError::Transport(format!(
                    "Failed to save new order: {err}. Data might be inconsistent."
                ));
                self.fail(&surfaced);
                Err(surfaced)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ControlDraft, ControlPatch, ControlStatus};

    fn refused() -> StoreError {
        StoreError::Http { status: 500, message: "database unavailable".into() }
    }

    fn orders(controls: &[Control]) -> Vec<i64> {
        controls.iter().map(|c| c.order).collect()
    }

    fn controls(n: usize) -> Vec<Control> {
        (0..n)
            .map(|i| {
                let mut control =
                    Control::from_draft(format!("c{i}"), ControlDraft::new(format!("DCF-{i}"), "t"));
                control.order = i as i64;
                control
            })
            .collect()
    }

    fn ids(controls: &[Control]) -> Vec<&str> {
        controls.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn moving_up_shifts_the_items_in_between_down() {
        let mut store = ListStore::with_state(controls(6), Vec::new());
        let pending = store.begin_reorder("c4", "c1").unwrap();

        assert_eq!(ids(store.controls()), ["c0", "c4", "c1", "c2", "c3", "c5"]);
        assert_eq!(store.control("c4").unwrap().order, 1);
        assert_eq!(store.control("c1").unwrap().order, 2);
        assert_eq!(store.control("c3").unwrap().order, 4);
        assert_eq!(pending.request().updates.len(), 6);
        assert_eq!(
            pending.request().updates[1],
            OrderUpdate { id: "c4".into(), order: 1 }
        );
    }

    #[test]
    fn moving_down_lands_on_the_target_index() {
        let mut store = ListStore::with_state(controls(5), Vec::new());
        let _ = store.begin_reorder("c1", "c3").unwrap();
        assert_eq!(ids(store.controls()), ["c0", "c2", "c3", "c1", "c4"]);
    }

    #[test]
    fn unknown_or_identical_ids_are_ignored() {
        let mut store = ListStore::with_state(controls(3), Vec::new());
        assert!(store.begin_reorder("c1", "c1").is_none());
        assert!(store.begin_reorder("c1", "missing").is_none());
        assert!(store.begin_reorder("missing", "c1").is_none());
        assert_eq!(ids(store.controls()), ["c0", "c1", "c2"]);
    }

    #[test]
    fn repeated_reorders_keep_order_contiguous() {
        let mut sparse = controls(7);
        for (i, control) in sparse.iter_mut().enumerate() {
            control.order = (i as i64) * 10 + 3;
        }
        let mut store = ListStore::with_state(sparse, Vec::new());
        let moves = [("c6", "c0"), ("c2", "c5"), ("c0", "c3"), ("c4", "c6"), ("c5", "c1")];
        for (moved, target) in moves {
            let _ = store.begin_reorder(moved, target).unwrap();
            let orders: Vec<i64> = store.controls().iter().map(|c| c.order).collect();
            assert_eq!(orders, (0..7).collect::<Vec<i64>>());
        }
    }

    #[test]
    fn failed_save_flags_a_resync_and_keeps_local_order() {
        let mut store = ListStore::with_state(controls(3), Vec::new());
        let pending = store.begin_reorder("c2", "c0").unwrap();
        let err = store
            .settle_reorder(
                pending,
                Err(StoreError::Http { status: 500, message: "write conflict".into() }),
            )
            .unwrap_err();

        assert!(store.needs_resync());
        assert!(err.to_string().contains("write conflict"));
        assert_eq!(ids(store.controls()), ["c2", "c0", "c1"]);
    }

    #[test]
    fn rejected_update_keeps_an_order_saved_in_the_meantime() {
        let mut store = ListStore::with_state(controls(4), Vec::new());
        let update = store
            .begin_update("c3", ControlPatch::status(ControlStatus::InReview))
            .unwrap()
            .unwrap();
        let reorder = store.begin_reorder("c3", "c0").unwrap();
        store.settle_reorder(reorder, Ok(())).unwrap();

        assert!(store.settle_update(update, Err(refused())).is_err());

        assert_eq!(ids(store.controls()), ["c3", "c0", "c1", "c2"]);
        assert_eq!(orders(store.controls()), [0, 1, 2, 3]);
        assert_eq!(store.control("c3").unwrap().status, ControlStatus::InProgress);
    }

    #[test]
    fn rejected_delete_after_a_reorder_goes_back_by_order() {
        let mut store = ListStore::with_state(controls(4), Vec::new());
        let delete = store.begin_delete("c2").unwrap();
        let reorder = store.begin_reorder("c3", "c0").unwrap();
        store.settle_reorder(reorder, Ok(())).unwrap();
        assert_eq!(orders(store.controls()), [0, 1, 2]);

        assert!(store.settle_delete(delete, Err(refused())).is_err());

        let after = orders(store.controls());
        assert_eq!(ids(store.controls()), ["c3", "c0", "c1", "c2"]);
        assert!(after.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
