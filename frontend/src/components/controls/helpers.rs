//! Utility functions for the controls board.
//!
//! - **User feedback**: transient toast notifications for failures.
//! - **Formatting**: due dates and technician names as shown on cards.
//! - **Markdown**: control explanations rendered with `pulldown_cmark`, with
//!   raw HTML in the source shown as text.
//! - **Bulk input**: turning pasted rows into drafts.

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use common::model::timestamp::{parse_due_date, INVALID_DATE_MESSAGE};
use common::model::{technician, ControlDraft, DateInput, Technician};
use pulldown_cmark::{html, Event, Parser};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Displays a temporary notification at the bottom of the screen.
///
/// Called from the store subscription whenever an operation fails, so every
/// rolled-back change is announced once. The toast removes itself after a few
/// seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                html_toast.set_class_name("toast");

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(4000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// `MM/DD/YYYY` in `zone`, or "No date set". Uses the same zone the timeline
/// buckets with, so a card never shows a day its section disagrees with.
pub fn format_due_date<Tz: TimeZone>(due: Option<DateTime<Utc>>, zone: &Tz) -> String {
    due.map(|d| d.with_timezone(zone).date_naive().format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| "No date set".to_string())
}

/// Value for an `<input type="date">`, read in `zone`.
pub fn date_input_value<Tz: TimeZone>(due: Option<DateTime<Utc>>, zone: &Tz) -> String {
    due.map(|d| d.with_timezone(zone).date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Midnight of the typed day in `zone`, as an instant.
pub fn due_from_input<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<DateTime<Utc>, String> {
    let day = parse_due_date(raw)?.date_naive();
    zone.from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|midnight| midnight.with_timezone(&Utc))
        .ok_or_else(|| INVALID_DATE_MESSAGE.to_string())
}

/// A date field as a patch value: blank clears, a readable day becomes its
/// midnight in `zone`, and anything else is passed through as text so the
/// store rejects it with the usual message.
pub fn due_input<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateInput> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(match due_from_input(raw, zone) {
        Ok(instant) => DateInput::At(instant),
        Err(_) => DateInput::Text(raw.to_string()),
    })
}

pub fn assignee_name(assignee_id: Option<&str>, technicians: &[Technician]) -> String {
    match assignee_id {
        None => "Unassigned".to_string(),
        Some(id) => technician::find(technicians, id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("Unknown ({id})")),
    }
}

/// The viewer's clock, used for timeline bucketing.
pub fn local_now() -> DateTime<Local> {
    Local::now()
}

/// Renders an explanation as markdown. Embedded HTML is turned into text so
/// stored content cannot inject markup into the board.
pub fn explanation_html(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Parses the bulk-add textarea: one control per line, fields separated by
/// `|` or tabs in the order DCF id, title, explanation. Blank lines are
/// skipped; missing fields are left empty so validation can name the row.
pub fn parse_bulk_rows(text: &str, first_order: i64) -> Vec<ControlDraft> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let mut fields = line.split(['|', '\t']).map(str::trim);
            let mut draft = ControlDraft::new(
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
            );
            draft.explanation = fields.collect::<Vec<_>>().join(" | ");
            draft.order = first_order + index as i64;
            draft
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn bulk_rows_split_on_pipes_and_tabs() {
        let drafts = parse_bulk_rows("A.5.1 | Policies | Define and approve\n\n  A.5.2\tRoles\n A.8.1 ", 10);
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].dcf_id, "A.5.1");
        assert_eq!(drafts[0].title, "Policies");
        assert_eq!(drafts[0].explanation, "Define and approve");
        assert_eq!(drafts[1].title, "Roles");
        assert_eq!(drafts[2].title, "");
        let orders: Vec<i64> = drafts.iter().map(|d| d.order).collect();
        assert_eq!(orders, [10, 11, 12]);
    }

    #[test]
    fn explanation_markdown_escapes_raw_html() {
        let html = explanation_html("Rotate **keys** <script>alert(1)</script>");
        assert!(html.contains("<strong>keys</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn dates_and_names() {
        let due = Utc.with_ymd_and_hms(2025, 1, 9, 0, 0, 0).unwrap();
        assert_eq!(format_due_date(Some(due), &Utc), "01/09/2025");
        assert_eq!(format_due_date(None, &Utc), "No date set");
        assert_eq!(date_input_value(Some(due), &Utc), "2025-01-09");

        let technicians = vec![Technician {
            id: "t1".into(),
            name: "Ada".into(),
            email: String::new(),
            agent_id: String::new(),
        }];
        assert_eq!(assignee_name(Some("t1"), &technicians), "Ada");
        assert_eq!(assignee_name(Some("t9"), &technicians), "Unknown (t9)");
        assert_eq!(assignee_name(None, &technicians), "Unassigned");
    }

    #[test]
    fn due_dates_are_shown_and_read_in_the_viewer_zone() {
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let late_evening = Utc.with_ymd_and_hms(2025, 1, 9, 3, 0, 0).unwrap();
        assert_eq!(format_due_date(Some(late_evening), &new_york), "01/08/2025");
        assert_eq!(date_input_value(Some(late_evening), &new_york), "2025-01-08");

        let entered = due_from_input("2025-01-08", &new_york).unwrap();
        assert_eq!(entered, Utc.with_ymd_and_hms(2025, 1, 8, 5, 0, 0).unwrap());
        assert_eq!(date_input_value(Some(entered), &new_york), "2025-01-08");
        assert_eq!(format_due_date(Some(entered), &new_york), "01/08/2025");
    }

    #[test]
    fn date_fields_become_patch_values() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(due_input("  ", &tokyo), None);
        assert_eq!(
            due_input("2025-03-01", &tokyo),
            Some(DateInput::At(Utc.with_ymd_and_hms(2025, 2, 28, 15, 0, 0).unwrap()))
        );
        assert_eq!(due_input("soon", &tokyo), Some(DateInput::Text("soon".into())));
        assert_eq!(due_from_input("soon", &tokyo), Err(INVALID_DATE_MESSAGE.to_string()));
    }
}
