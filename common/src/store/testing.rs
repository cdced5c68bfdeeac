//! In-memory stand-in for the HTTP API.

use super::api::ControlsApi;
use crate::error::StoreError;
use crate::model::{Control, ControlDraft, Technician};
use crate::requests::{
    DeleteControlRequest, RenameTechnicianRequest, ReorderRequest, UpdateControlRequest,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub controls: RefCell<Vec<Control>>,
    pub technicians: RefCell<Vec<Technician>>,
    pub calls: RefCell<Vec<String>>,
    failures: RefCell<HashMap<&'static str, StoreError>>,
    failing_titles: RefCell<HashSet<String>>,
    next_id: Cell<u64>,
}

impl FakeApi {
    pub fn with_state(controls: Vec<Control>, technicians: Vec<Technician>) -> Self {
        let api = Self::default();
        *api.controls.borrow_mut() = controls;
        *api.technicians.borrow_mut() = technicians;
        api
    }

    /// Makes every call to `operation` fail with `err`.
    pub fn fail(&self, operation: &'static str, err: StoreError) {
        self.failures.borrow_mut().insert(operation, err);
    }

    pub fn heal(&self, operation: &'static str) {
        self.failures.borrow_mut().remove(operation);
    }

    /// Makes creating a control with this title fail with a 500.
    pub fn fail_title(&self, title: &str) {
        self.failing_titles.borrow_mut().insert(title.to_string());
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(operation))
            .count()
    }

    fn enter(&self, operation: &'static str, detail: &str) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(format!("{operation} {detail}"));
        match self.failures.borrow().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::from_response(404, "Not Found", &format!(r#"{{"message":"{id} not found"}}"#), "reach server")
    }
}

impl ControlsApi for FakeApi {
    async fn list_controls(&self) -> Result<Vec<Control>, StoreError> {
        self.enter("list_controls", "")?;
        Ok(self.controls.borrow().clone())
    }

    async fn list_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        self.enter("list_technicians", "")?;
        Ok(self.technicians.borrow().clone())
    }

    async fn create_control(&self, draft: &ControlDraft) -> Result<Control, StoreError> {
        self.enter("create_control", &draft.title)?;
        if self.failing_titles.borrow().contains(&draft.title) {
            return Err(StoreError::from_response(
                500,
                "Internal Server Error",
                "<html>upstream exploded</html>",
                "create control",
            ));
        }
        self.next_id.set(self.next_id.get() + 1);
        let control = Control::from_draft(format!("srv-{}", self.next_id.get()), draft.clone());
        self.controls.borrow_mut().push(control.clone());
        Ok(control)
    }

    async fn update_control(&self, request: &UpdateControlRequest) -> Result<Control, StoreError> {
        self.enter("update_control", &request.id)?;
        let mut controls = self.controls.borrow_mut();
        let control = controls
            .iter_mut()
            .find(|c| c.id == request.id)
            .ok_or_else(|| Self::not_found(&request.id))?;
        request.patch.apply_to(control);
        Ok(control.clone())
    }

    async fn delete_control(&self, request: &DeleteControlRequest) -> Result<(), StoreError> {
        self.enter("delete_control", &request.id)?;
        let mut controls = self.controls.borrow_mut();
        let before = controls.len();
        controls.retain(|c| c.id != request.id);
        if controls.len() == before {
            return Err(Self::not_found(&request.id));
        }
        Ok(())
    }

    async fn reorder_controls(&self, request: &ReorderRequest) -> Result<(), StoreError> {
        self.enter("reorder_controls", "")?;
        let mut controls = self.controls.borrow_mut();
        for update in &request.updates {
            if let Some(control) = controls.iter_mut().find(|c| c.id == update.id) {
                control.order = update.order;
            }
        }
        Ok(())
    }

    async fn rename_technician(
        &self,
        id: &str,
        request: &RenameTechnicianRequest,
    ) -> Result<Technician, StoreError> {
        self.enter("rename_technician", id)?;
        let mut technicians = self.technicians.borrow_mut();
        let technician = technicians
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        technician.name = request.name.clone();
        Ok(technician.clone())
    }

    async fn delete_technician(&self, id: &str) -> Result<(), StoreError> {
        self.enter("delete_technician", id)?;
        self.technicians.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }
}
