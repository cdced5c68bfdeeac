use super::pending::{PendingTechnicianDelete, PendingTechnicianRename};
use super::{Change, ListStore};
use crate::error::StoreError;
use crate::requests::RenameTechnicianRequest;

impl ListStore {
    /// Renames a technician locally. Returns `Ok(None)` for an unknown id.
    pub fn begin_rename_technician(
        &mut self,
        id: &str,
        name: &str,
    ) -> Result<Option<PendingTechnicianRename>, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "Invalid technician name provided".to_string(),
            ));
        }
        let Some(technician) = self.technicians.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        let snapshot = technician.clone();
        technician.name = name.to_string();
        self.error = None;
        self.notify(Change::TechniciansChanged);

        Ok(Some(PendingTechnicianRename {
            snapshot,
            request: RenameTechnicianRequest {
                name: name.to_string(),
            },
        }))
    }

    pub fn settle_rename_technician(
        &mut self,
        pending: PendingTechnicianRename,
        outcome: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                log::error!("failed to rename technician {}: {err}", pending.snapshot.id);
                if let Some(technician) = self
                    .technicians
                    .iter_mut()
                    .find(|t| t.id == pending.snapshot.id)
                {
                    *technician = pending.snapshot;
                    self.notify(Change::TechniciansChanged);
                }
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Removes a technician locally. Controls assigned to it keep the dangling
    /// reference.
    pub fn begin_delete_technician(&mut self, id: &str) -> Option<PendingTechnicianDelete> {
        let index = self.technicians.iter().position(|t| t.id == id)?;
        self.error = None;
        let snapshot = self.technicians.remove(index);
        self.notify(Change::TechniciansChanged);
        Some(PendingTechnicianDelete { index, snapshot })
    }

    pub fn settle_delete_technician(
        &mut self,
        pending: PendingTechnicianDelete,
        outcome: Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => {
                log::error!("failed to delete technician {}: {err}", pending.snapshot.id);
                if !self.technicians.iter().any(|t| t.id == pending.snapshot.id) {
                    let index = pending.index.min(self.technicians.len());
                    self.technicians.insert(index, pending.snapshot);
                    self.notify(Change::TechniciansChanged);
                }
                self.fail(&err);
                Err(err)
            }
        }
    }
}
