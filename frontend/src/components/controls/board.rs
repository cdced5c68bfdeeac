//! Kanban and timeline layouts over the filtered controls.

use super::cards::control_card;
use super::helpers::local_now;
use super::messages::Msg;
use super::state::ControlsBoard;
use crate::board_grid::BoardGrid;
use common::model::Control;
use common::views::{bucket_timeline, group_controls, GroupKey};
use yew::html::Scope;
use yew::prelude::*;

pub fn kanban(component: &ControlsBoard, link: &Scope<ControlsBoard>, visible: &[&Control]) -> Html {
    let technicians = component.store.technicians();
    let groups = group_controls(visible.iter().copied(), technicians, component.group_by);

    html! {
        <BoardGrid columns={groups.len()}>
            { for groups.into_iter().map(|group| {
                let title = group.key.title(technicians);
                let key = group.key.clone();
                let ondrop = link.callback(move |e: DragEvent| {
                    e.prevent_default();
                    Msg::DropOnGroup(key.clone())
                });
                html! {
                    <section
                        key={column_key(&group.key)}
                        class="board-column"
                        ondragover={Callback::from(|e: DragEvent| e.prevent_default())}
                        {ondrop}
                    >
                        <header class="column-header">
                            <h2>{ title }</h2>
                            <span class="count">{ group.controls.len().to_string() }</span>
                        </header>
                        { cards(component, link, &group.controls) }
                    </section>
                }
            }) }
        </BoardGrid>
    }
}

pub fn timeline(component: &ControlsBoard, link: &Scope<ControlsBoard>, visible: &[&Control]) -> Html {
    let groups = bucket_timeline(visible.iter().copied(), &local_now());
    if groups.is_empty() {
        return html! { <p class="empty">{"No controls match the current filters."}</p> };
    }

    html! {
        <div class="timeline">
            { for groups.into_iter().map(|group| {
                let bucket = group.bucket;
                let collapsed = component.collapsed.contains(&bucket);
                html! {
                    <section
                        key={bucket.title()}
                        class={classes!("timeline-section", collapsed.then_some("collapsed"))}
                    >
                        <header
                            class="column-header"
                            role="button"
                            aria-expanded={(!collapsed).to_string()}
                            onclick={link.callback(move |_| Msg::ToggleTimelineSection(bucket))}
                        >
                            <h2>{ bucket.title() }</h2>
                            <span class="count">{ group.controls.len().to_string() }</span>
                        </header>
                        {
                            if collapsed {
                                html! {}
                            } else {
                                cards(component, link, &group.controls)
                            }
                        }
                    </section>
                }
            }) }
        </div>
    }
}

fn cards(component: &ControlsBoard, link: &Scope<ControlsBoard>, controls: &[&Control]) -> Html {
    if controls.is_empty() {
        return html! { <p class="empty">{"No controls"}</p> };
    }
    html! {
        <div class="card-list">
            { for controls.iter().map(|control| control_card(component, link, control)) }
        </div>
    }
}

fn column_key(key: &GroupKey) -> String {
    match key {
        GroupKey::Status(status) => format!("status-{}", status.label()),
        GroupKey::Assignee(id) => format!("assignee-{id}"),
        GroupKey::Unassigned => "unassigned".to_string(),
        GroupKey::All => "all".to_string(),
    }
}
