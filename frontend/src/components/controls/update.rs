//! Update function for the controls board.
//!
//! Elm-style: `update` receives the state, the `Context` and a `Msg`, mutates
//! the state and returns whether to re-render.
//!
//! Every data change follows the same three steps. The store's `begin_*`
//! applies the change locally and hands back a pending value; a spawned task
//! sends the request and comes back with a `*Settled` message; the store's
//! `settle_*` then commits or rolls back. No borrow of the component is held
//! while a request is in flight, so several operations can overlap.

use super::helpers::{due_input, parse_bulk_rows};
use super::messages::Msg;
use super::state::{BatchField, ControlsBoard, RenameDraft};
use chrono::{Local, NaiveDate};
use common::model::{ControlPatch, ControlStatus};
use common::store::{fetch_all, submit_sequentially, ControlsApi};
use common::views::{DateRange, GroupBy, GroupKey};
use common::StoreError;
use futures_util::future::join_all;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

/// Value of the batch assignee select that clears the assignee.
pub const UNASSIGN: &str = "__unassign__";

pub fn update(component: &mut ControlsBoard, ctx: &Context<ControlsBoard>, msg: Msg) -> bool {
    let link = ctx.link().clone();
    let api = component.api;

    match msg {
        Msg::Load => {
            component.store.begin_load();
            spawn_local(async move {
                let outcome = fetch_all(&api).await;
                link.send_message(Msg::Loaded(outcome));
            });
            true
        }
        Msg::Loaded(outcome) => {
            let _ = component.store.settle_load(outcome);
            true
        }
        Msg::DismissError => {
            component.store.clear_error();
            true
        }

        Msg::SetViewMode(mode) => {
            component.view_mode = mode;
            component.dragging = None;
            component.drag_over = None;
            true
        }
        Msg::SetDensity(density) => {
            component.density = density;
            true
        }
        Msg::SetGroupBy(group_by) => {
            component.group_by = group_by;
            true
        }
        Msg::ToggleTimelineSection(bucket) => {
            toggle(&mut component.collapsed, bucket);
            true
        }

        Msg::SetSearch(search) => {
            component.filters.search = search;
            true
        }
        Msg::ToggleStatusFilter(status) => {
            toggle(&mut component.filters.status, status);
            true
        }
        Msg::TogglePriorityFilter(priority) => {
            toggle(&mut component.filters.priority, priority);
            true
        }
        Msg::ToggleAssigneeFilter(id) => {
            toggle(&mut component.filters.assignee, id);
            true
        }
        Msg::ToggleCompanyFilter(company) => {
            toggle(&mut component.filters.company, company);
            true
        }
        Msg::SetTagFilter(tag) => {
            component.filters.tags.clear();
            let tag = tag.trim();
            if !tag.is_empty() {
                component.filters.tags.insert(tag.to_string());
            }
            true
        }
        Msg::SetDateFrom(raw) => {
            let range = component.filters.date_range.get_or_insert_with(DateRange::default);
            range.start = parse_day(&raw);
            true
        }
        Msg::SetDateTo(raw) => {
            let range = component.filters.date_range.get_or_insert_with(DateRange::default);
            range.end = parse_day(&raw);
            true
        }
        Msg::ClearFilters => {
            component.filters = Default::default();
            true
        }

        Msg::OpenAddForm(open) => {
            if open {
                component.add_form = Default::default();
                component.store.clear_error();
            }
            component.store.set_add_form_open(open);
            true
        }
        Msg::EditAddForm(field, value) => {
            component.add_form.set(field, value);
            true
        }
        Msg::SubmitAdd => {
            let draft = match component.add_form.to_draft(component.next_order(), &Local) {
                Ok(draft) => draft,
                Err(message) => {
                    component.add_form.error = Some(message);
                    return true;
                }
            };
            match component.store.begin_add(draft) {
                Ok(pending) => {
                    component.add_form.error = None;
                    spawn_local(async move {
                        let outcome = api.create_control(pending.request()).await;
                        link.send_message(Msg::AddSettled(pending, outcome));
                    });
                }
                Err(err) => component.add_form.error = Some(err.to_string()),
            }
            true
        }
        Msg::AddSettled(pending, outcome) => {
            if let Err(err) = component.store.settle_add(pending, outcome) {
                component.add_form.error = Some(err.to_string());
            } else {
                component.add_form = Default::default();
            }
            true
        }

        Msg::OpenBulkForm(open) => {
            if open {
                component.bulk_error = None;
            }
            component.store.set_bulk_add_form_open(open);
            true
        }
        Msg::SetBulkText(text) => {
            component.bulk_text = text;
            true
        }
        Msg::SubmitBulk => {
            let drafts = parse_bulk_rows(&component.bulk_text, component.next_order());
            if drafts.is_empty() {
                component.bulk_error = Some("Enter at least one control.".to_string());
                return true;
            }
            match component.store.begin_add_many(drafts) {
                Ok(pending) => {
                    component.bulk_error = None;
                    component.bulk_text.clear();
                    spawn_local(async move {
                        let outcomes = submit_sequentially(&api, pending.requests()).await;
                        link.send_message(Msg::BulkSettled(pending, outcomes));
                    });
                }
                Err(err) => component.bulk_error = Some(err.to_string()),
            }
            true
        }
        Msg::BulkSettled(pending, outcomes) => {
            let requested = pending.requests().len();
            let created = component.store.settle_add_many(pending, outcomes);
            if created < requested {
                gloo_console::warn!(format!("{} of {requested} controls were not added", requested - created));
            }
            true
        }

        Msg::UpdateControl(id, patch) => {
            send_update(component, &link, &id, patch);
            true
        }
        Msg::SetDueDate(id, raw) => {
            let input = due_input(&raw, &Local);
            send_update(component, &link, &id, ControlPatch::due_date(input));
            true
        }
        Msg::UpdateSettled(pending, outcome) => {
            let _ = component.store.settle_update(pending, outcome);
            true
        }
        Msg::DeleteControl(id) => {
            if let Some(pending) = component.store.begin_delete(&id) {
                spawn_local(async move {
                    let outcome = api.delete_control(pending.request()).await;
                    link.send_message(Msg::DeleteSettled(pending, outcome));
                });
            }
            true
        }
        Msg::DeleteSettled(pending, outcome) => {
            let _ = component.store.settle_delete(pending, outcome);
            true
        }

        Msg::DragStart(id) => {
            if component.view_mode.accepts_drops() {
                component.dragging = Some(id);
            }
            false
        }
        Msg::DragEnter(id) => {
            if component.drag_over.as_deref() == Some(id.as_str()) {
                return false;
            }
            component.drag_over = Some(id);
            true
        }
        Msg::DragEnd => {
            component.dragging = None;
            component.drag_over = None;
            true
        }
        Msg::DropOnControl(target_id) => {
            component.drag_over = None;
            let Some(moved_id) = component.dragging.take() else {
                return true;
            };
            if !component.view_mode.accepts_drops() {
                return true;
            }
            // Dropping into another column also moves the control to that group.
            let target_key = component
                .store
                .control(&target_id)
                .map(|target| group_of(target, component.group_by));
            let moved_key = component
                .store
                .control(&moved_id)
                .map(|moved| group_of(moved, component.group_by));
            if let (Some(target_key), Some(moved_key)) = (target_key, moved_key) {
                if target_key != moved_key {
                    if let Some(patch) = patch_for_group(&target_key) {
                        send_update(component, &link, &moved_id, patch);
                    }
                }
            }
            if let Some(pending) = component.store.begin_reorder(&moved_id, &target_id) {
                spawn_local(async move {
                    let outcome = api.reorder_controls(pending.request()).await;
                    link.send_message(Msg::ReorderSettled(pending, outcome));
                });
            }
            true
        }
        Msg::DropOnGroup(key) => {
            component.drag_over = None;
            let Some(moved_id) = component.dragging.take() else {
                return true;
            };
            if !component.view_mode.accepts_drops() {
                return true;
            }
            let current = component
                .store
                .control(&moved_id)
                .map(|moved| group_of(moved, component.group_by));
            if current.as_ref() != Some(&key) {
                if let Some(patch) = patch_for_group(&key) {
                    send_update(component, &link, &moved_id, patch);
                }
            }
            true
        }
        Msg::ReorderSettled(pending, outcome) => {
            if component.store.settle_reorder(pending, outcome).is_err() {
                ctx.link().send_message(Msg::Load);
            }
            true
        }

        Msg::ToggleSelect(id) => {
            component.store.toggle_selection(&id);
            true
        }
        Msg::SelectVisible => {
            let ids: Vec<String> = component.visible().iter().map(|c| c.id.clone()).collect();
            component.store.select_all(ids.iter().map(String::as_str));
            true
        }
        Msg::ClearSelection => {
            component.store.clear_selection();
            true
        }
        Msg::SetBatchField(field, value) => {
            match field {
                BatchField::Status => component.batch.status = value,
                BatchField::Assignee => component.batch.assignee = value,
                BatchField::DueDate => component.batch.due_date = value,
            }
            true
        }
        Msg::ApplyBatch => {
            let patch = batch_patch(component);
            if patch.is_empty() {
                return false;
            }
            let ids: Vec<String> = component.store.selection().iter().cloned().collect();
            match component
                .store
                .begin_batch_update(ids.iter().map(String::as_str), patch)
            {
                Ok(pending) => {
                    component.batch = Default::default();
                    spawn_local(async move {
                        let outcomes = join_all(
                            pending
                                .updates()
                                .iter()
                                .map(|update| api.update_control(update.request())),
                        )
                        .await
                        .into_iter()
                        .map(|outcome| outcome.map(|_| ()))
                        .collect();
                        link.send_message(Msg::BatchSettled(pending, outcomes));
                    });
                }
                Err(err) => super::helpers::show_toast(&err.to_string()),
            }
            true
        }
        Msg::BatchSettled(pending, outcomes) => {
            component.store.settle_batch_update(pending, outcomes);
            true
        }

        Msg::OpenTechnicians(open) => {
            component.technicians_open = open;
            if !open {
                component.renaming = None;
            }
            true
        }
        Msg::StartRename(id) => {
            let name = component
                .store
                .technician(&id)
                .map(|t| t.name.clone())
                .unwrap_or_default();
            component.renaming = Some(RenameDraft { id, name });
            true
        }
        Msg::EditRename(name) => {
            if let Some(draft) = component.renaming.as_mut() {
                draft.name = name;
            }
            true
        }
        Msg::CancelRename => {
            component.renaming = None;
            true
        }
        Msg::SaveRename => {
            let Some(draft) = component.renaming.take() else {
                return false;
            };
            match component.store.begin_rename_technician(&draft.id, &draft.name) {
                Ok(Some(pending)) => spawn_local(async move {
                    let outcome = api
                        .rename_technician(pending.id(), pending.request())
                        .await
                        .map(|_| ());
                    link.send_message(Msg::RenameSettled(pending, outcome));
                }),
                Ok(None) => {}
                Err(err) => {
                    super::helpers::show_toast(&err.to_string());
                    component.renaming = Some(draft);
                }
            }
            true
        }
        Msg::RenameSettled(pending, outcome) => {
            let _ = component.store.settle_rename_technician(pending, outcome);
            true
        }
        Msg::DeleteTechnician(id) => {
            if let Some(pending) = component.store.begin_delete_technician(&id) {
                spawn_local(async move {
                    let outcome = api.delete_technician(pending.id()).await;
                    link.send_message(Msg::TechnicianDeleteSettled(pending, outcome));
                });
            }
            true
        }
        Msg::TechnicianDeleteSettled(pending, outcome) => {
            let _ = component.store.settle_delete_technician(pending, outcome);
            true
        }
    }
}

/// Starts one optimistic update. Validation failures (an unreadable date) are
/// toasted and nothing is sent.
fn send_update(
    component: &mut ControlsBoard,
    link: &Scope<ControlsBoard>,
    id: &str,
    patch: ControlPatch,
) {
    let api = component.api;
    match component.store.begin_update(id, patch) {
        Ok(Some(pending)) => {
            let link = link.clone();
            spawn_local(async move {
                let outcome = api.update_control(pending.request()).await.map(|_| ());
                link.send_message(Msg::UpdateSettled(pending, outcome));
            });
        }
        Ok(None) => {}
        Err(err @ StoreError::Validation(_)) => super::helpers::show_toast(&err.to_string()),
        Err(err) => gloo_console::error!(err.to_string()),
    }
}

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn group_of(control: &common::model::Control, group_by: GroupBy) -> GroupKey {
    match group_by {
        GroupBy::Status => GroupKey::Status(control.status),
        GroupBy::Assignee => match control.assignee() {
            Some(id) => GroupKey::Assignee(id.to_string()),
            None => GroupKey::Unassigned,
        },
        GroupBy::None => GroupKey::All,
    }
}

/// The change that moves a control into the column `key`.
fn patch_for_group(key: &GroupKey) -> Option<ControlPatch> {
    match key {
        GroupKey::Status(status) => Some(ControlPatch::status(*status)),
        GroupKey::Assignee(id) => Some(ControlPatch::assignee(Some(id.clone()))),
        GroupKey::Unassigned => Some(ControlPatch::assignee(None)),
        GroupKey::All => None,
    }
}

fn batch_patch(component: &ControlsBoard) -> ControlPatch {
    let batch = &component.batch;
    let mut patch = ControlPatch::default();
    if let Some(status) = ControlStatus::from_label(&batch.status) {
        patch.status = Some(status);
    }
    match batch.assignee.as_str() {
        "" => {}
        UNASSIGN => patch.assignee_id = Some(None),
        id => patch.assignee_id = Some(Some(id.to_string())),
    }
    if let Some(input) = due_input(&batch.due_date, &Local) {
        patch.estimated_completion_date = Some(Some(input));
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::views::TimelineBucket;

    #[test]
    fn dropping_on_a_column_patches_its_field() {
        assert_eq!(
            patch_for_group(&GroupKey::Status(ControlStatus::InReview)),
            Some(ControlPatch::status(ControlStatus::InReview))
        );
        assert_eq!(
            patch_for_group(&GroupKey::Unassigned),
            Some(ControlPatch::assignee(None))
        );
        assert_eq!(patch_for_group(&GroupKey::All), None);
    }

    #[test]
    fn day_inputs_parse_or_clear() {
        assert_eq!(parse_day("2025-02-28"), NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn timeline_sections_fold_and_unfold() {
        let mut collapsed = std::collections::BTreeSet::new();
        toggle(&mut collapsed, TimelineBucket::Completed);
        toggle(&mut collapsed, TimelineBucket::NoDueDate);
        assert!(collapsed.contains(&TimelineBucket::Completed));

        toggle(&mut collapsed, TimelineBucket::Completed);
        assert_eq!(collapsed.into_iter().collect::<Vec<_>>(), [TimelineBucket::NoDueDate]);
    }
}
