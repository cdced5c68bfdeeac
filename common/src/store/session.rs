use super::api::{ControlsApi, fetch_all, submit_sequentially};
use super::ListStore;
use crate::error::StoreError;
use crate::model::{ControlDraft, ControlPatch};
use futures_util::future;

/// A store paired with the API it talks to.
///
/// Each method runs the whole begin / request / settle sequence and holds the
/// store mutably for its duration. Callers that need several requests in flight
/// at once use the `begin_*` / `settle_*` pairs on [`ListStore`] directly.
pub struct Session<A> {
    store: ListStore,
    api: A,
}

impl<A: ControlsApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self::with_store(ListStore::new(), api)
    }

    pub fn with_store(store: ListStore, api: A) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ListStore {
        &mut self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.store.begin_load();
        let outcome = fetch_all(&self.api).await;
        self.store.settle_load(outcome)
    }

    /// Returns the id the server assigned.
    pub async fn add(&mut self, draft: ControlDraft) -> Result<String, StoreError> {
        let pending = self.store.begin_add(draft)?;
        let outcome = self.api.create_control(pending.request()).await;
        let id = outcome.as_ref().map(|c| c.id.clone()).ok();
        self.store.settle_add(pending, outcome)?;
        Ok(id.unwrap_or_default())
    }

    /// Returns how many drafts were stored.
    pub async fn add_many(&mut self, drafts: Vec<ControlDraft>) -> Result<usize, StoreError> {
        let pending = self.store.begin_add_many(drafts)?;
        let outcomes = submit_sequentially(&self.api, pending.requests()).await;
        Ok(self.store.settle_add_many(pending, outcomes))
    }

    pub async fn update(&mut self, id: &str, patch: ControlPatch) -> Result<(), StoreError> {
        let Some(pending) = self.store.begin_update(id, patch)? else {
            return Ok(());
        };
        let outcome = self.api.update_control(pending.request()).await.map(|_| ());
        self.store.settle_update(pending, outcome)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(pending) = self.store.begin_delete(id) else {
            return Ok(());
        };
        let outcome = self.api.delete_control(pending.request()).await;
        self.store.settle_delete(pending, outcome)
    }

    /// On failure the collection is reloaded before the error is returned.
    pub async fn reorder(&mut self, moved_id: &str, target_id: &str) -> Result<(), StoreError> {
        let Some(pending) = self.store.begin_reorder(moved_id, target_id) else {
            return Ok(());
        };
        let outcome = self.api.reorder_controls(pending.request()).await;
        if let Err(err) = self.store.settle_reorder(pending, outcome) {
            if let Err(reload) = self.load().await {
                log::error!("resync after failed reorder also failed: {reload}");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Updates are sent concurrently and settle independently. Only a patch that
    /// fails validation is reported; per-control failures are logged and left in
    /// [`ListStore::error`].
    pub async fn batch_update<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a str>,
        patch: ControlPatch,
    ) -> Result<(), StoreError> {
        let pending = self.store.begin_batch_update(ids, patch)?;
        let outcomes = future::join_all(
            pending
                .updates()
                .iter()
                .map(|update| self.api.update_control(update.request())),
        )
        .await
        .into_iter()
        .map(|outcome| outcome.map(|_| ()))
        .collect();
        self.store.settle_batch_update(pending, outcomes);
        Ok(())
    }

    /// Batch update over the current selection.
    pub async fn update_selection(&mut self, patch: ControlPatch) -> Result<(), StoreError> {
        let ids: Vec<String> = self.store.selection().iter().cloned().collect();
        self.batch_update(ids.iter().map(String::as_str), patch).await
    }

    pub async fn rename_technician(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let Some(pending) = self.store.begin_rename_technician(id, name)? else {
            return Ok(());
        };
        let outcome = self
            .api
            .rename_technician(pending.id(), pending.request())
            .await
            .map(|_| ());
        self.store.settle_rename_technician(pending, outcome)
    }

    pub async fn delete_technician(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(pending) = self.store.begin_delete_technician(id) else {
            return Ok(());
        };
        let outcome = self.api.delete_technician(pending.id()).await;
        self.store.settle_delete_technician(pending, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Control, ControlStatus, DateInput, Technician};
    use crate::store::testing::FakeApi;
    use crate::store::{Change, is_temp_id};
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn seeded(n: usize) -> Vec<Control> {
        (0..n)
            .map(|i| {
                let mut control = Control::from_draft(
                    format!("c{i}"),
                    ControlDraft::new(format!("DCF-{i}"), format!("Control {i}")),
                );
                control.order = i as i64;
                control
            })
            .collect()
    }

    fn technician(id: &str, name: &str) -> Technician {
        Technician {
            id: id.into(),
            name: name.into(),
            email: format!("{id}@example.com"),
            agent_id: String::new(),
        }
    }

    async fn loaded(n: usize) -> Session<FakeApi> {
        let api = FakeApi::with_state(seeded(n), vec![technician("t1", "Ada")]);
        let mut session = Session::new(api);
        session.load().await.unwrap();
        session
    }

    fn id_set(store: &ListStore) -> BTreeSet<String> {
        store.controls().iter().map(|c| c.id.clone()).collect()
    }

    fn server_error() -> StoreError {
        StoreError::from_response(500, "Internal Server Error", r#"{"message":"database unavailable"}"#, "reach server")
    }

    #[tokio::test]
    async fn load_replaces_state_in_display_order() {
        let mut shuffled = seeded(3);
        shuffled.reverse();
        let mut session = Session::new(FakeApi::with_state(shuffled, vec![technician("t1", "Ada")]));
        session.load().await.unwrap();

        let ids: Vec<&str> = session.store().controls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c1", "c2"]);
        assert_eq!(session.store().technicians().len(), 1);
        assert!(!session.store().loading());
    }

    #[tokio::test]
    async fn failed_load_keeps_nothing() {
        let mut session = loaded(3).await;
        session.api().fail("list_technicians", server_error());

        let err = session.load().await.unwrap_err();
        assert_eq!(err.to_string(), "database unavailable");
        assert!(session.store().controls().is_empty());
        assert!(session.store().technicians().is_empty());
        assert_eq!(session.store().error(), Some("database unavailable"));
    }

    #[tokio::test]
    async fn add_replaces_the_placeholder_with_the_stored_control() {
        let mut session = loaded(2).await;
        session.store_mut().set_add_form_open(true);

        let id = session.add(ControlDraft::new("DCF-9", "New control")).await.unwrap();

        let store = session.store();
        assert_eq!(store.controls().iter().filter(|c| c.id == id).count(), 1);
        assert!(!store.controls().iter().any(|c| is_temp_id(&c.id)));
        assert_eq!(store.controls().last().map(|c| c.id.as_str()), Some(id.as_str()));
        assert!(!store.add_form_open());
    }

    #[tokio::test]
    async fn add_with_unparseable_500_rolls_back_and_names_the_status() {
        let mut session = loaded(2).await;
        let before = id_set(session.store());
        session.api().fail_title("Doomed");

        let err = session.add(ControlDraft::new("DCF-9", "Doomed")).await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert_eq!(id_set(session.store()), before);
        assert!(session.store().add_form_open());
        assert_eq!(session.store().error(), Some(err.to_string().as_str()));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_server() {
        let mut session = loaded(1).await;
        let err = session.add(ControlDraft::new("", "No identifier")).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(session.api().calls_to("create_control"), 0);
        assert_eq!(session.store().controls().len(), 1);
    }

    #[tokio::test]
    async fn add_many_drops_the_failed_draft_and_keeps_the_rest() {
        let mut session = loaded(1).await;
        session.api().fail_title("second");
        let drafts = vec![
            ControlDraft::new("DCF-1", "first"),
            ControlDraft::new("DCF-2", "second"),
            ControlDraft::new("DCF-3", "third"),
        ];

        let created = session.add_many(drafts).await.unwrap();

        assert_eq!(created, 2);
        let titles: Vec<&str> = session.store().controls().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Control 0", "first", "third"]);
        assert!(!session.store().controls().iter().any(|c| is_temp_id(&c.id)));
        let calls: Vec<String> = session
            .api()
            .calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("create_control"))
            .cloned()
            .collect();
        assert_eq!(calls, ["create_control first", "create_control second", "create_control third"]);
    }

    #[tokio::test]
    async fn status_update_touches_nothing_else() {
        let mut session = loaded(3).await;
        let before = session.store().control("c1").unwrap().clone();

        session.update("c1", ControlPatch::status(ControlStatus::Complete)).await.unwrap();

        let mut after = session.store().control("c1").unwrap().clone();
        assert_eq!(after.status, ControlStatus::Complete);
        after.status = before.status;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn rejected_update_restores_the_snapshot() {
        let mut session = loaded(3).await;
        let before = session.store().control("c2").unwrap().clone();
        session.api().fail("update_control", server_error());

        let err = session
            .update("c2", ControlPatch::assignee(Some("t1".into())))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(session.store().control("c2"), Some(&before));
    }

    #[tokio::test]
    async fn bad_date_fails_before_any_request() {
        let mut session = loaded(2).await;
        let before = session.store().controls().to_vec();

        let err = session
            .update("c0", ControlPatch::due_date(Some(DateInput::Text("tomorrow-ish".into()))))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(session.api().calls_to("update_control"), 0);
        assert_eq!(session.store().controls(), before.as_slice());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_no_op() {
        let mut session = loaded(1).await;
        session.update("nope", ControlPatch::status(ControlStatus::InReview)).await.unwrap();
        assert_eq!(session.api().calls_to("update_control"), 0);
    }

    #[tokio::test]
    async fn rejected_delete_puts_the_control_back_in_place() {
        let mut session = loaded(4).await;
        session.api().fail("delete_control", server_error());

        assert!(session.delete("c2").await.is_err());

        let ids: Vec<&str> = session.store().controls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn delete_leaves_gaps_in_order() {
        let mut session = loaded(4).await;
        session.delete("c1").await.unwrap();

        let orders: Vec<i64> = session.store().controls().iter().map(|c| c.order).collect();
        assert_eq!(orders, [0, 2, 3]);
    }

    #[tokio::test]
    async fn failed_reorder_resynchronizes_from_the_server() {
        let mut session = loaded(4).await;
        session.api().fail("reorder_controls", server_error());

        let err = session.reorder("c3", "c0").await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to save new order"));
        assert_eq!(session.api().calls_to("list_controls"), 2);
        let ids: Vec<&str> = session.store().controls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c1", "c2", "c3"]);
        assert!(!session.store().needs_resync());
    }

    #[tokio::test]
    async fn reorder_is_persisted() {
        let mut session = loaded(5).await;
        session.reorder("c4", "c1").await.unwrap();

        let server: Vec<(String, i64)> = session
            .api()
            .controls
            .borrow()
            .iter()
            .map(|c| (c.id.clone(), c.order))
            .collect();
        assert!(server.contains(&("c4".to_string(), 1)));
        assert!(server.contains(&("c1".to_string(), 2)));
    }

    #[tokio::test]
    async fn batch_update_is_per_control_and_always_clears_selection() {
        let mut session = loaded(3).await;
        session.store_mut().select_all(["c0", "c1", "c2"]);
        session.api().controls.borrow_mut().retain(|c| c.id != "c1");

        session.update_selection(ControlPatch::status(ControlStatus::InReview)).await.unwrap();

        let store = session.store();
        assert_eq!(store.control("c0").unwrap().status, ControlStatus::InReview);
        assert_eq!(store.control("c1").unwrap().status, ControlStatus::InProgress);
        assert_eq!(store.control("c2").unwrap().status, ControlStatus::InReview);
        assert!(store.selection().is_empty());
        assert_eq!(
            store.error(),
            Some("Failed to perform batch update. Please try again.")
        );
    }

    #[tokio::test]
    async fn technician_rename_rolls_back_on_failure() {
        let mut session = loaded(1).await;
        session.api().fail("rename_technician", server_error());

        assert!(session.rename_technician("t1", "Grace").await.is_err());
        assert_eq!(session.store().technician("t1").unwrap().name, "Ada");

        session.api().heal("rename_technician");
        session.rename_technician("t1", "Grace").await.unwrap();
        assert_eq!(session.store().technician("t1").unwrap().name, "Grace");
    }

    #[tokio::test]
    async fn technician_delete_does_not_touch_assignments() {
        let mut session = loaded(2).await;
        session.update("c0", ControlPatch::assignee(Some("t1".into()))).await.unwrap();

        session.delete_technician("t1").await.unwrap();

        assert!(session.store().technicians().is_empty());
        assert_eq!(session.store().control("c0").unwrap().assignee_id.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn subscribers_hear_about_changes() {
        let mut session = loaded(2).await;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = session
            .store_mut()
            .subscribe(move |change| sink.borrow_mut().push(change.clone()));

        session.update("c0", ControlPatch::status(ControlStatus::InReview)).await.unwrap();
        assert_eq!(seen.borrow().as_slice(), [Change::ControlChanged("c0".into())]);

        assert!(session.store_mut().unsubscribe(subscription));
        session.delete("c1").await.unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn overlapping_updates_roll_back_independently() {
        let mut store = ListStore::with_state(seeded(2), Vec::new());
        let first = store
            .begin_update("c0", ControlPatch::status(ControlStatus::Complete))
            .unwrap()
            .unwrap();
        let second = store
            .begin_update("c1", ControlPatch::status(ControlStatus::InReview))
            .unwrap()
            .unwrap();

        store.settle_update(first, Err(server_error())).unwrap_err();
        store.settle_update(second, Ok(())).unwrap();

        assert_eq!(store.control("c0").unwrap().status, ControlStatus::InProgress);
        assert_eq!(store.control("c1").unwrap().status, ControlStatus::InReview);
    }
}
