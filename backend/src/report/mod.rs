//! # Controls Report
//!
//! Renders the downloadable HTML snapshot served by `GET /api/controls/extract`.
//! The page is standalone: styles are inlined and nothing is fetched when it is
//! opened. Every piece of stored text goes through [`escape_html`].

use chrono::NaiveDateTime;
use common::model::{technician, Control, ControlStatus, Technician};
use std::fmt::Write;

const EXPLANATION_PREVIEW_CHARS: usize = 100;

const STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; background-color: #f8fafc; padding: 20px; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 12px; margin-bottom: 30px; }
.header h1 { font-size: 2.5rem; font-weight: 700; margin-bottom: 10px; }
.export-info { font-size: 1.1rem; opacity: 0.9; }
.stats { display: flex; gap: 30px; margin: 30px 0; flex-wrap: wrap; }
.stat-card { background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); min-width: 150px; text-align: center; }
.stat-number { font-size: 2rem; font-weight: bold; color: #4f46e5; }
.stat-label { color: #6b7280; font-size: 0.9rem; margin-top: 5px; }
.section { background: white; border-radius: 12px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); margin-bottom: 30px; overflow: hidden; }
.section-header { padding: 20px 30px; border-bottom: 1px solid #e5e7eb; font-size: 1.3rem; font-weight: 600; color: #1f2937; }
table { width: 100%; border-collapse: collapse; }
th { background: #f9fafb; padding: 15px; text-align: left; font-weight: 600; color: #374151; border-bottom: 2px solid #e5e7eb; }
td { padding: 15px; border-bottom: 1px solid #f3f4f6; vertical-align: top; }
.dcf-badge { background: #4f46e5; color: white; padding: 6px 12px; border-radius: 6px; font-weight: 600; font-family: 'Courier New', monospace; }
.task-title { font-weight: 600; color: #1f2937; margin-bottom: 5px; }
.task-description { color: #6b7280; font-size: 0.9rem; line-height: 1.4; }
.url-link { display: inline-block; color: #4f46e5; text-decoration: none; padding: 4px 8px; border-radius: 4px; border: 1px solid #e0e7ff; margin: 2px 0; font-size: 0.9rem; }
.ticket-url { background: #fef3c7; color: #92400e; border-color: #fcd34d; }
.no-url { color: #9ca3af; font-style: italic; font-size: 0.9rem; }
.technician-name { font-weight: 600; color: #1f2937; }
.technician-email { color: #6b7280; font-size: 0.9rem; }
.date-cell { font-family: 'Courier New', monospace; font-size: 0.9rem; color: #6b7280; }
@media print { body { background: white; padding: 0; } .section { box-shadow: none; border: 1px solid #e5e7eb; } }
"#;

/// Escapes the five characters that are significant in HTML text and
/// attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// First hundred characters of the explanation, with `...` when cut.
fn preview(explanation: &str) -> String {
    let mut chars = explanation.chars();
    let head: String = chars.by_ref().take(EXPLANATION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn links_cell(control: &Control) -> String {
    let mut links = Vec::new();
    if let Some(url) = &control.ticket_url {
        links.push(format!(
            r#"<a href="{}" target="_blank" class="url-link ticket-url">Ticket {}</a>"#,
            escape_html(url),
            escape_html(control.ticket_number.as_deref().unwrap_or_default())
        ));
    }
    if let Some(url) = &control.external_url {
        links.push(format!(
            r#"<a href="{}" target="_blank" class="url-link details-url">Details</a>"#,
            escape_html(url)
        ));
    }
    if links.is_empty() {
        r#"<span class="no-url">No URLs available</span>"#.to_string()
    } else {
        links.join("<br>")
    }
}

fn technician_cell(control: &Control, technicians: &[Technician]) -> String {
    match control
        .assignee()
        .and_then(|id| technician::find(technicians, id))
    {
        None => r#"<div class="technician-name">Unassigned</div>"#.to_string(),
        Some(tech) if tech.email.is_empty() => format!(
            r#"<div class="technician-name">{}</div>"#,
            escape_html(&tech.name)
        ),
        Some(tech) => format!(
            r#"<div class="technician-name">{}</div><div class="technician-email">{}</div>"#,
            escape_html(&tech.name),
            escape_html(&tech.email)
        ),
    }
}

fn due_date_cell(control: &Control) -> String {
    control
        .estimated_completion_date
        .map(|due| due.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| "No date set".to_string())
}

fn stat_card(out: &mut String, count: usize, label: &str) {
    let _ = write!(
        out,
        r#"<div class="stat-card"><div class="stat-number">{count}</div><div class="stat-label">{label}</div></div>"#
    );
}

/// Builds the full report. Controls are listed by ascending `order`.
pub fn render_report(
    controls: &[Control],
    technicians: &[Technician],
    generated_at: NaiveDateTime,
) -> String {
    let mut ordered: Vec<&Control> = controls.iter().collect();
    ordered.sort_by_key(|c| c.order);

    let date = generated_at.format("%m/%d/%Y").to_string();
    let time = generated_at.format("%H:%M:%S").to_string();
    let total = ordered.len();

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>ISO 27001:2022 Controls Export - {date}</title>
<style>{STYLES}</style>
</head>
<body>
<div class="header">
<h1>ISO 27001:2022 Compliance Controls</h1>
<div class="export-info">
<div>Export Date: {date} at {time}</div>
<div>Total Controls: {total}</div>
</div>
</div>
<div class="stats">
"#
    );

    stat_card(&mut out, total, "Total Controls");
    for status in ControlStatus::ALL {
        let count = ordered.iter().filter(|c| c.status == status).count();
        stat_card(&mut out, count, status.label());
    }

    let _ = write!(
        out,
        r#"
</div>
<div class="section">
<div class="section-header">All Controls ({total})</div>
<table>
<thead>
<tr>
<th style="width: 120px;">DCF #</th>
<th style="width: 40%;">Task Name</th>
<th style="width: 25%;">URLs</th>
<th style="width: 25%;">Technician</th>
<th style="width: 120px;">Due Date</th>
</tr>
</thead>
<tbody>
"#
    );

    for control in &ordered {
        let _ = write!(
            out,
            r#"<tr class="control-row">
<td class="dcf-cell"><span class="dcf-badge">{dcf}</span></td>
<td class="task-cell"><div class="task-title">{title}</div><div class="task-description">{explanation}</div></td>
<td class="url-cell">{links}</td>
<td class="technician-cell">{technician}</td>
<td class="date-cell">{due}</td>
</tr>
"#,
            dcf = escape_html(&control.dcf_id),
            title = escape_html(&control.title),
            explanation = escape_html(&preview(&control.explanation)),
            links = links_cell(control),
            technician = technician_cell(control, technicians),
            due = due_date_cell(control),
        );
    }

    let _ = write!(
        out,
        r#"</tbody>
</table>
</div>
<div style="margin-top: 40px; text-align: center; color: #6b7280; font-size: 0.9rem;">
<p>Generated from ISO Tracker Application</p>
<p>This report contains {total} compliance controls as of {date}</p>
</div>
</body>
</html>
"#
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use common::model::ControlDraft;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn control(id: &str, order: i64) -> Control {
        let mut control = Control::from_draft(id, ControlDraft::new(format!("DCF-{id}"), format!("Title {id}")));
        control.order = order;
        control
    }

    fn technicians() -> Vec<Technician> {
        vec![Technician {
            id: "t1".into(),
            name: "Dana <Ops>".into(),
            email: "dana@example.com".into(),
            agent_id: String::new(),
        }]
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn truncates_long_explanations_by_character() {
        assert_eq!(preview("short"), "short");
        let exact = "é".repeat(100);
        assert_eq!(preview(&exact), exact);
        let long = "é".repeat(101);
        assert_eq!(preview(&long), format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn renders_rows_in_order_with_fallbacks() {
        let mut first = control("b", 0);
        first.title = "<b>Access</b> review".into();
        first.assignee_id = Some("t1".into());
        first.estimated_completion_date = Some(Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap());
        first.ticket_url = Some("https://tickets.example.com/SEC-1".into());
        first.ticket_number = Some("SEC-1".into());
        first.status = ControlStatus::Complete;
        let second = control("a", 1);

        let html = render_report(&[second, first], &technicians(), generated_at());

        assert!(html.contains("Export Date: 06/02/2025 at 14:05:09"));
        assert!(html.contains("All Controls (2)"));
        assert!(html.find("DCF-b").unwrap() < html.find("DCF-a").unwrap());
        assert!(html.contains("&lt;b&gt;Access&lt;/b&gt; review"));
        assert!(!html.contains("<b>Access"));
        assert!(html.contains("Dana &lt;Ops&gt;"));
        assert!(html.contains("dana@example.com"));
        assert!(html.contains("07/04/2025"));
        assert!(html.contains("Ticket SEC-1"));
        assert!(html.contains("No URLs available"));
        assert!(html.contains("Unassigned"));
        assert!(html.contains("No date set"));
        assert!(html.contains(r#"<div class="stat-number">1</div><div class="stat-label">Complete</div>"#));
    }
}
