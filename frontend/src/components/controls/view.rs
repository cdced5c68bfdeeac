//! View rendering for the controls board.
//!
//! Layout, top to bottom: toolbar, error banner, filter bar, batch toolbar
//! (only with a selection), then the kanban or timeline body. The sheets are
//! rendered last so they stack above the board.

use super::board::{kanban, timeline};
use super::messages::Msg;
use super::sheets::sheets;
use super::state::{BatchField, ControlsBoard, Density, ViewMode};
use super::update::UNASSIGN;
use crate::api::extract_url;
use common::model::{Company, ControlStatus, PriorityLevel};
use common::views::{GroupBy, UNASSIGNED};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn view(component: &ControlsBoard, ctx: &Context<ControlsBoard>) -> Html {
    let link = ctx.link();
    let visible = component.visible();
    let total = component.store.controls().len();

    html! {
        <div class="controls-root">
            { build_toolbar(component, link) }
            { build_error_banner(component, link) }
            { build_filter_bar(component, link, visible.len(), total) }
            { build_batch_toolbar(component, link) }
            <main class="board">
                {
                    if component.store.loading() && total == 0 {
                        html! { <p class="loading">{"Loading controls…"}</p> }
                    } else {
                        match component.view_mode {
                            ViewMode::Kanban => kanban(component, link, &visible),
                            ViewMode::Timeline => timeline(component, link, &visible),
                        }
                    }
                }
            </main>
            { sheets(component, link) }
        </div>
    }
}

fn build_toolbar(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    let mode_button = |mode: ViewMode, label: &'static str| {
        html! {
            <button
                class={classes!("tab-btn", (component.view_mode == mode).then_some("active"))}
                onclick={link.callback(move |_| Msg::SetViewMode(mode))}
            >
                { label }
            </button>
        }
    };

    html! {
        <header class="toolbar">
            <h1>{"ISO Controls"}</h1>
            <div class="tab-bar">
                { mode_button(ViewMode::Kanban, "Kanban") }
                { mode_button(ViewMode::Timeline, "Timeline") }
            </div>
            {
                if component.view_mode == ViewMode::Kanban {
                    html! {
                        <label class="inline">
                            {"Group by"}
                            <select onchange={link.callback(|e: Event| {
                                Msg::SetGroupBy(match e.target_unchecked_into::<HtmlSelectElement>().value().as_str() {
                                    "assignee" => GroupBy::Assignee,
                                    "none" => GroupBy::None,
                                    _ => GroupBy::Status,
                                })
                            })}>
                                <option value="status" selected={component.group_by == GroupBy::Status}>{"Status"}</option>
                                <option value="assignee" selected={component.group_by == GroupBy::Assignee}>{"Assignee"}</option>
                                <option value="none" selected={component.group_by == GroupBy::None}>{"None"}</option>
                            </select>
                        </label>
                    }
                } else {
                    html! {}
                }
            }
            <label class="inline">
                {"Density"}
                <select onchange={link.callback(|e: Event| {
                    let value = e.target_unchecked_into::<HtmlSelectElement>().value();
                    Msg::SetDensity(
                        Density::ALL
                            .into_iter()
                            .find(|d| d.label() == value)
                            .unwrap_or_default(),
                    )
                })}>
                    { for Density::ALL.iter().map(|density| html! {
                        <option value={density.label()} selected={*density == component.density}>
                            { density.label() }
                        </option>
                    }) }
                </select>
            </label>
            <div class="spacer" />
            <button class="primary" onclick={link.callback(|_| Msg::OpenAddForm(true))}>{"Add Control"}</button>
            <button onclick={link.callback(|_| Msg::OpenBulkForm(true))}>{"Bulk Add"}</button>
            <button onclick={link.callback(|_| Msg::OpenTechnicians(true))}>{"Technicians"}</button>
            <a class="button" href={extract_url()} download="controls-export.html">{"Export HTML"}</a>
        </header>
    }
}

fn build_error_banner(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    let Some(message) = component.store.error() else {
        return html! {};
    };
    html! {
        <div class="error-banner" role="alert">
            <span>{ message.to_string() }</span>
            {
                if component.store.needs_resync() {
                    html! { <button onclick={link.callback(|_| Msg::Load)}>{"Reload"}</button> }
                } else {
                    html! {}
                }
            }
            <button class="icon-btn" title="Dismiss" onclick={link.callback(|_| Msg::DismissError)}>{"×"}</button>
        </div>
    }
}

fn build_filter_bar(
    component: &ControlsBoard,
    link: &Scope<ControlsBoard>,
    shown: usize,
    total: usize,
) -> Html {
    let filters = &component.filters;
    let range = filters.date_range.unwrap_or_default();
    let day = |date: Option<chrono::NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    };

    html! {
        <section class="filter-bar">
            <input
                type="search"
                placeholder="Search controls"
                value={filters.search.clone()}
                oninput={link.callback(|e: InputEvent| {
                    Msg::SetSearch(e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />
            <div class="chips">
                { for ControlStatus::ALL.iter().map(|status| {
                    let status = *status;
                    chip(status.label(), filters.status.contains(&status),
                        link.callback(move |_| Msg::ToggleStatusFilter(status)))
                }) }
            </div>
            <div class="chips">
                { for PriorityLevel::ALL.iter().map(|priority| {
                    let priority = *priority;
                    chip(priority.label(), filters.priority.contains(&priority),
                        link.callback(move |_| Msg::TogglePriorityFilter(priority)))
                }) }
            </div>
            <div class="chips">
                { for Company::ALL.iter().map(|company| {
                    let company = *company;
                    chip(company.label(), filters.company.contains(&company),
                        link.callback(move |_| Msg::ToggleCompanyFilter(company)))
                }) }
            </div>
            <div class="chips">
                { for component.store.technicians().iter().map(|technician| {
                    let id = technician.id.clone();
                    chip(&technician.name, filters.assignee.contains(&id),
                        link.callback(move |_| Msg::ToggleAssigneeFilter(id.clone())))
                }) }
                { chip("Unassigned", filters.assignee.contains(UNASSIGNED),
                    link.callback(|_| Msg::ToggleAssigneeFilter(UNASSIGNED.to_string()))) }
            </div>
            <input
                type="text"
                placeholder="Tag"
                value={filters.tags.iter().next().cloned().unwrap_or_default()}
                onchange={link.callback(|e: Event| {
                    Msg::SetTagFilter(e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />
            <label class="inline">
                {"Due from"}
                <input type="date" value={day(range.start)} onchange={link.callback(|e: Event| {
                    Msg::SetDateFrom(e.target_unchecked_into::<HtmlInputElement>().value())
                })} />
            </label>
            <label class="inline">
                {"to"}
                <input type="date" value={day(range.end)} onchange={link.callback(|e: Event| {
                    Msg::SetDateTo(e.target_unchecked_into::<HtmlInputElement>().value())
                })} />
            </label>
            <span class="count">{ format!("{shown} of {total} controls") }</span>
            <button onclick={link.callback(|_| Msg::SelectVisible)} disabled={shown == 0}>{"Select shown"}</button>
            {
                if filters.is_active() {
                    html! { <button onclick={link.callback(|_| Msg::ClearFilters)}>{"Clear filters"}</button> }
                } else {
                    html! {}
                }
            }
        </section>
    }
}

fn build_batch_toolbar(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    let selected = component.store.selection().len();
    if selected == 0 {
        return html! {};
    }
    let batch = &component.batch;
    let on_select = |field: BatchField| {
        link.callback(move |e: Event| {
            Msg::SetBatchField(field, e.target_unchecked_into::<HtmlSelectElement>().value())
        })
    };

    html! {
        <section class="batch-toolbar">
            <strong>{ format!("{selected} selected") }</strong>
            <select onchange={on_select(BatchField::Status)}>
                <option value="" selected={batch.status.is_empty()}>{"Status: unchanged"}</option>
                { for ControlStatus::ALL.iter().map(|status| html! {
                    <option value={status.label()} selected={batch.status == status.label()}>
                        { status.label() }
                    </option>
                }) }
            </select>
            <select onchange={on_select(BatchField::Assignee)}>
                <option value="" selected={batch.assignee.is_empty()}>{"Assignee: unchanged"}</option>
                <option value={UNASSIGN} selected={batch.assignee == UNASSIGN}>{"Unassigned"}</option>
                { for component.store.technicians().iter().map(|t| html! {
                    <option value={t.id.clone()} selected={batch.assignee == t.id}>{ &t.name }</option>
                }) }
            </select>
            <input
                type="date"
                value={batch.due_date.clone()}
                onchange={link.callback(|e: Event| Msg::SetBatchField(
                    BatchField::DueDate,
                    e.target_unchecked_into::<HtmlInputElement>().value(),
                ))}
            />
            <button class="primary" onclick={link.callback(|_| Msg::ApplyBatch)}>{"Apply"}</button>
            <button onclick={link.callback(|_| Msg::ClearSelection)}>{"Clear selection"}</button>
        </section>
    }
}

fn chip(label: &str, active: bool, onclick: Callback<MouseEvent>) -> Html {
    html! {
        <button class={classes!("chip", active.then_some("active"))} {onclick}>
            { label.to_string() }
        </button>
    }
}
