//! Contents of the sliding sheets: single add, bulk add and technicians.

use super::form::FormField;
use super::messages::Msg;
use super::state::ControlsBoard;
use crate::top_sheet::TopSheet;
use common::model::{Company, ControlStatus, PriorityLevel};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn sheets(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    html! {
        <>
            <TopSheet
                open={component.store.add_form_open()}
                title="Add Control"
                on_close={link.callback(|_| Msg::OpenAddForm(false))}
            >
                { add_form(component, link) }
            </TopSheet>
            <TopSheet
                open={component.store.bulk_add_form_open()}
                title="Bulk Add Controls"
                on_close={link.callback(|_| Msg::OpenBulkForm(false))}
            >
                { bulk_form(component, link) }
            </TopSheet>
            <TopSheet
                open={component.technicians_open}
                title="Technicians"
                on_close={link.callback(|_| Msg::OpenTechnicians(false))}
            >
                { technician_panel(component, link) }
            </TopSheet>
        </>
    }
}

fn add_form(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    let form = &component.add_form;
    let technicians = component.store.technicians();
    let onsubmit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::SubmitAdd
    });

    html! {
        <form class="sheet-form" {onsubmit}>
            { error_line(form.error.as_deref()) }
            { text_input(link, "DCF ID", FormField::DcfId, &form.dcf_id, "text") }
            { text_input(link, "Title", FormField::Title, &form.title, "text") }
            <label>
                {"Explanation (markdown)"}
                <textarea
                    rows="4"
                    value={form.explanation.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::EditAddForm(
                        FormField::Explanation,
                        e.target_unchecked_into::<HtmlTextAreaElement>().value(),
                    ))}
                />
            </label>
            <div class="form-row">
                { select_input(link, "Status", FormField::Status,
                    ControlStatus::ALL.iter().map(|s| (s.label().to_string(), s.label().to_string())).collect(),
                    form.status.label()) }
                { select_input(link, "Priority", FormField::Priority,
                    std::iter::once((String::new(), "None".to_string()))
                        .chain(PriorityLevel::ALL.iter().map(|p| (p.label().to_string(), p.label().to_string())))
                        .collect(),
                    form.priority.map(|p| p.label()).unwrap_or_default()) }
                { select_input(link, "Company", FormField::Company,
                    Company::ALL.iter().map(|c| (c.label().to_string(), c.label().to_string())).collect(),
                    form.company.label()) }
            </div>
            <div class="form-row">
                { select_input(link, "Assignee", FormField::Assignee,
                    std::iter::once((String::new(), "Unassigned".to_string()))
                        .chain(technicians.iter().map(|t| (t.id.clone(), t.name.clone())))
                        .collect(),
                    &form.assignee_id) }
                { text_input(link, "Estimated completion", FormField::DueDate, &form.due_date, "date") }
            </div>
            { text_input(link, "Tags (comma separated)", FormField::Tags, &form.tags, "text") }
            { text_input(link, "Reference URL", FormField::ExternalUrl, &form.external_url, "text") }
            <div class="form-row">
                { text_input(link, "Ticket number", FormField::TicketNumber, &form.ticket_number, "text") }
                { text_input(link, "Ticket URL", FormField::TicketUrl, &form.ticket_url, "text") }
            </div>
            <div class="form-actions">
                <button type="button" onclick={link.callback(|_| Msg::OpenAddForm(false))}>{"Cancel"}</button>
                <button type="submit" class="primary">{"Add Control"}</button>
            </div>
        </form>
    }
}

fn bulk_form(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    html! {
        <div class="sheet-form">
            { error_line(component.bulk_error.as_deref()) }
            <p class="hint">
                {"One control per line: DCF ID | Title | Explanation. Tabs work as separators too."}
            </p>
            <textarea
                rows="12"
                placeholder="A.5.1 | Policies for information security | Define and approve policies"
                value={component.bulk_text.clone()}
                oninput={link.callback(|e: InputEvent| {
                    Msg::SetBulkText(e.target_unchecked_into::<HtmlTextAreaElement>().value())
                })}
            />
            <div class="form-actions">
                <button onclick={link.callback(|_| Msg::OpenBulkForm(false))}>{"Cancel"}</button>
                <button class="primary" onclick={link.callback(|_| Msg::SubmitBulk)}>{"Add All"}</button>
            </div>
        </div>
    }
}

fn technician_panel(component: &ControlsBoard, link: &Scope<ControlsBoard>) -> Html {
    let technicians = component.store.technicians();
    if technicians.is_empty() {
        return html! { <p class="empty">{"No technicians yet."}</p> };
    }
    let controls = component.store.controls();

    html! {
        <ul class="technician-list">
            { for technicians.iter().map(|technician| {
                let id = technician.id.clone();
                let assigned = controls.iter().filter(|c| c.assignee() == Some(id.as_str())).count();
                let editing = component
                    .renaming
                    .as_ref()
                    .filter(|draft| draft.id == technician.id);

                match editing {
                    Some(draft) => html! {
                        <li key={id.clone()} class="technician editing">
                            <input
                                type="text"
                                value={draft.name.clone()}
                                oninput={link.callback(|e: InputEvent| {
                                    Msg::EditRename(e.target_unchecked_into::<HtmlInputElement>().value())
                                })}
                                onkeydown={link.batch_callback(|e: KeyboardEvent| match e.key().as_str() {
                                    "Enter" => Some(Msg::SaveRename),
                                    "Escape" => Some(Msg::CancelRename),
                                    _ => None,
                                })}
                            />
                            <button class="primary" onclick={link.callback(|_| Msg::SaveRename)}>{"Save"}</button>
                            <button onclick={link.callback(|_| Msg::CancelRename)}>{"Cancel"}</button>
                        </li>
                    },
                    None => {
                        let rename_id = id.clone();
                        let delete_id = id.clone();
                        html! {
                            <li key={id} class="technician">
                                <span class="name">{ &technician.name }</span>
                                <span class="count" title="Assigned controls">{ assigned.to_string() }</span>
                                <button onclick={link.callback(move |_| Msg::StartRename(rename_id.clone()))}>
                                    {"Rename"}
                                </button>
                                <button class="danger" onclick={link.callback(move |_| Msg::DeleteTechnician(delete_id.clone()))}>
                                    {"Delete"}
                                </button>
                            </li>
                        }
                    }
                }
            }) }
        </ul>
    }
}

fn text_input(
    link: &Scope<ControlsBoard>,
    label: &'static str,
    field: FormField,
    value: &str,
    input_type: &'static str,
) -> Html {
    html! {
        <label>
            { label }
            <input
                type={input_type}
                value={value.to_string()}
                oninput={link.callback(move |e: InputEvent| {
                    Msg::EditAddForm(field, e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />
        </label>
    }
}

fn select_input(
    link: &Scope<ControlsBoard>,
    label: &'static str,
    field: FormField,
    options: Vec<(String, String)>,
    current: &str,
) -> Html {
    html! {
        <label>
            { label }
            <select onchange={link.callback(move |e: Event| {
                Msg::EditAddForm(field, e.target_unchecked_into::<HtmlSelectElement>().value())
            })}>
                { for options.into_iter().map(|(value, text)| {
                    let selected = value == current;
                    html! { <option {value} {selected}>{ text }</option> }
                }) }
            </select>
        </label>
    }
}

fn error_line(error: Option<&str>) -> Html {
    match error {
        Some(message) => html! { <p class="form-error">{ message.to_string() }</p> },
        None => html! {},
    }
}
