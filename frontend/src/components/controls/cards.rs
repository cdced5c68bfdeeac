//! A single control card, rendered at the board's current density.
//!
//! On the kanban board cards are drag sources and drop targets. Dropping on a
//! card reorders; the drop is stopped there so the column underneath does not
//! also handle it. Timeline cards are ordered by due date and cannot be dragged.

use super::helpers::{assignee_name, date_input_value, explanation_html, format_due_date};
use chrono::Local;
use super::messages::Msg;
use super::state::{ControlsBoard, Density};
use common::model::{Control, ControlPatch, ControlStatus, Technician};
use common::store::is_temp_id;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn control_card(
    component: &ControlsBoard,
    link: &Scope<ControlsBoard>,
    control: &Control,
) -> Html {
    let id = control.id.clone();
    let saving = is_temp_id(&id);
    let technicians = component.store.technicians();
    let selected = component.store.is_selected(&id);
    let movable = !saving && component.view_mode.accepts_drops();
    let drag_over = movable && component.drag_over.as_deref() == Some(id.as_str());

    let ondragstart = movable.then(|| {
        let id = id.clone();
        link.callback(move |e: DragEvent| {
            if let Some(transfer) = e.data_transfer() {
                let _ = transfer.set_data("text/plain", &id);
            }
            Msg::DragStart(id.clone())
        })
    });
    let ondragenter = movable.then(|| {
        let id = id.clone();
        link.callback(move |_: DragEvent| Msg::DragEnter(id.clone()))
    });
    let ondragover = movable.then(|| Callback::from(|e: DragEvent| e.prevent_default()));
    let ondrop = movable.then(|| {
        let id = id.clone();
        link.callback(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::DropOnControl(id.clone())
        })
    });
    let ondragend = movable.then(|| link.callback(|_: DragEvent| Msg::DragEnd));

    html! {
        <article
            key={id.clone()}
            class={classes!(
                "card",
                density_class(component.density),
                status_class(control.status),
                selected.then_some("selected"),
                drag_over.then_some("drag-over"),
                saving.then_some("saving"),
                (!movable).then_some("fixed"),
            )}
            draggable={movable.to_string()}
            {ondragstart}
            {ondragenter}
            {ondragover}
            {ondrop}
            {ondragend}
        >
            <header class="card-header">
                <input
                    type="checkbox"
                    checked={selected}
                    disabled={saving}
                    onclick={{
                        let id = id.clone();
                        link.callback(move |_| Msg::ToggleSelect(id.clone()))
                    }}
                />
                <span class="dcf-id">{ &control.dcf_id }</span>
                { priority_badge(control) }
                <span class={classes!("badge", status_class(control.status))}>
                    { control.status.label() }
                </span>
            </header>
            <h3 class="card-title">{ &control.title }</h3>
            {
                if component.density == Density::Compact {
                    html! {}
                } else {
                    card_details(component, link, control, technicians, saving)
                }
            }
        </article>
    }
}

fn card_details(
    component: &ControlsBoard,
    link: &Scope<ControlsBoard>,
    control: &Control,
    technicians: &[Technician],
    saving: bool,
) -> Html {
    let id = control.id.clone();

    let on_status = {
        let id = id.clone();
        link.batch_callback(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            ControlStatus::from_label(&value)
                .map(|status| Msg::UpdateControl(id.clone(), ControlPatch::status(status)))
        })
    };
    let on_assignee = {
        let id = id.clone();
        link.callback(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let assignee = Some(value).filter(|v| !v.is_empty());
            Msg::UpdateControl(id.clone(), ControlPatch::assignee(assignee))
        })
    };
    let on_due = {
        let id = id.clone();
        link.callback(move |e: Event| {
            Msg::SetDueDate(id.clone(), e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };

    html! {
        <>
            <div class="card-meta">
                <span title="Assignee">
                    { assignee_name(control.assignee(), technicians) }
                </span>
                <span title="Estimated completion">
                    { format_due_date(control.estimated_completion_date, &Local) }
                </span>
                <span class="company">{ control.company.label() }</span>
            </div>
            { tag_list(&control.tags) }
            <div class="card-editors">
                <select disabled={saving} onchange={on_status}>
                    { for ControlStatus::ALL.iter().map(|status| html! {
                        <option value={status.label()} selected={*status == control.status}>
                            { status.label() }
                        </option>
                    }) }
                </select>
                <select disabled={saving} onchange={on_assignee}>
                    <option value="" selected={control.assignee().is_none()}>{"Unassigned"}</option>
                    { for technicians.iter().map(|t| html! {
                        <option value={t.id.clone()} selected={control.assignee() == Some(t.id.as_str())}>
                            { &t.name }
                        </option>
                    }) }
                </select>
                <input
                    type="date"
                    disabled={saving}
                    value={date_input_value(control.estimated_completion_date, &Local)}
                    onchange={on_due}
                />
            </div>
            {
                if component.density == Density::Full {
                    full_details(link, control, saving)
                } else {
                    html! {}
                }
            }
        </>
    }
}

fn full_details(link: &Scope<ControlsBoard>, control: &Control, saving: bool) -> Html {
    let id = control.id.clone();
    html! {
        <>
            <div class="markdown-preview">
                { Html::from_html_unchecked(explanation_html(&control.explanation).into()) }
            </div>
            <div class="card-links">
                {
                    match &control.external_url {
                        Some(url) => html! {
                            <a href={url.clone()} target="_blank" rel="noopener noreferrer">{"Reference"}</a>
                        },
                        None => html! {},
                    }
                }
                {
                    match (&control.ticket_number, &control.ticket_url) {
                        (Some(number), Some(url)) => html! {
                            <a href={url.clone()} target="_blank" rel="noopener noreferrer">
                                { format!("Ticket {number}") }
                            </a>
                        },
                        (Some(number), None) => html! { <span>{ format!("Ticket {number}") }</span> },
                        (None, Some(url)) => html! {
                            <a href={url.clone()} target="_blank" rel="noopener noreferrer">{"Ticket"}</a>
                        },
                        (None, None) => html! {},
                    }
                }
            </div>
            <footer class="card-footer">
                <button
                    class="danger"
                    disabled={saving}
                    onclick={link.callback(move |_| Msg::DeleteControl(id.clone()))}
                >
                    {"Delete"}
                </button>
            </footer>
        </>
    }
}

fn priority_badge(control: &Control) -> Html {
    match control.priority_level {
        Some(priority) => html! {
            <span class="badge priority">{ priority.label() }</span>
        },
        None => html! {},
    }
}

fn tag_list(tags: &[String]) -> Html {
    if tags.is_empty() {
        return html! {};
    }
    html! {
        <ul class="tags">
            { for tags.iter().map(|tag| html! { <li>{ tag }</li> }) }
        </ul>
    }
}

fn density_class(density: Density) -> &'static str {
    match density {
        Density::Compact => "compact",
        Density::Medium => "medium",
        Density::Full => "full",
    }
}

fn status_class(status: ControlStatus) -> &'static str {
    match status {
        ControlStatus::InProgress => "status-in-progress",
        ControlStatus::InReview => "status-in-review",
        ControlStatus::Complete => "status-complete",
    }
}
