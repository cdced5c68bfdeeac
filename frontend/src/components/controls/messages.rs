use super::form::FormField;
use super::state::{BatchField, Density, ViewMode};
use common::model::{Company, Control, ControlPatch, ControlStatus, PriorityLevel, Technician};
use common::store::{
    PendingAdd, PendingAddMany, PendingBatchUpdate, PendingDelete, PendingReorder,
    PendingTechnicianDelete, PendingTechnicianRename, PendingUpdate,
};
use common::views::{GroupBy, GroupKey, TimelineBucket};
use common::StoreError;

#[derive(Clone)]
pub enum Msg {
    Load,
    Loaded(Result<(Vec<Control>, Vec<Technician>), StoreError>),
    DismissError,

    SetViewMode(ViewMode),
    SetDensity(Density),
    SetGroupBy(GroupBy),
    ToggleTimelineSection(TimelineBucket),

    SetSearch(String),
    ToggleStatusFilter(ControlStatus),
    TogglePriorityFilter(PriorityLevel),
    ToggleAssigneeFilter(String),
    ToggleCompanyFilter(Company),
    SetTagFilter(String),
    SetDateFrom(String),
    SetDateTo(String),
    ClearFilters,

    OpenAddForm(bool),
    EditAddForm(FormField, String),
    SubmitAdd,
    AddSettled(PendingAdd, Result<Control, StoreError>),

    OpenBulkForm(bool),
    SetBulkText(String),
    SubmitBulk,
    BulkSettled(PendingAddMany, Vec<Result<Control, StoreError>>),

    UpdateControl(String, ControlPatch),
    UpdateSettled(PendingUpdate, Result<(), StoreError>),
    SetDueDate(String, String),
    DeleteControl(String),
    DeleteSettled(PendingDelete, Result<(), StoreError>),

    DragStart(String),
    DragEnter(String),
    DragEnd,
    DropOnControl(String),
    DropOnGroup(GroupKey),
    ReorderSettled(PendingReorder, Result<(), StoreError>),

    ToggleSelect(String),
    SelectVisible,
    ClearSelection,
    SetBatchField(BatchField, String),
    ApplyBatch,
    BatchSettled(PendingBatchUpdate, Vec<Result<(), StoreError>>),

    OpenTechnicians(bool),
    StartRename(String),
    EditRename(String),
    SaveRename,
    CancelRename,
    RenameSettled(PendingTechnicianRename, Result<(), StoreError>),
    DeleteTechnician(String),
    TechnicianDeleteSettled(PendingTechnicianDelete, Result<(), StoreError>),
}
