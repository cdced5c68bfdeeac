use crate::model::{Company, Control, ControlStatus, PriorityLevel};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Assignee token matching controls nobody is assigned to.
pub const UNASSIGNED: &str = "unassigned";

/// Inclusive range of due dates. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Criteria of the filter bar. An empty set or blank search matches
/// everything; criteria are combined with AND, values inside a set with OR.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlFilters {
    pub search: String,
    pub status: BTreeSet<ControlStatus>,
    pub priority: BTreeSet<PriorityLevel>,
    pub assignee: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub company: BTreeSet<Company>,
    pub date_range: Option<DateRange>,
}

impl ControlFilters {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.status.is_empty()
            || !self.priority.is_empty()
            || !self.assignee.is_empty()
            || !self.tags.is_empty()
            || !self.company.is_empty()
            || self.date_range.is_some_and(|range| !range.is_open())
    }

    pub fn matches(&self, control: &Control) -> bool {
        self.matches_search(control)
            && (self.status.is_empty() || self.status.contains(&control.status))
            && (self.priority.is_empty()
                || control
                    .priority_level
                    .is_some_and(|p| self.priority.contains(&p)))
            && self.matches_assignee(control)
            && (self.tags.is_empty() || control.tags.iter().any(|t| self.tags.contains(t)))
            && (self.company.is_empty() || self.company.contains(&control.company))
            && self.matches_due_date(control)
    }

    /// Keeps the matching controls in their original order.
    pub fn apply<'a>(&self, controls: impl IntoIterator<Item = &'a Control>) -> Vec<&'a Control> {
        controls.into_iter().filter(|c| self.matches(c)).collect()
    }

    fn matches_search(&self, control: &Control) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&needle);
        hit(&control.dcf_id)
            || hit(&control.title)
            || hit(&control.explanation)
            || control.tags.iter().any(|t| hit(t))
            || control.ticket_number.as_deref().is_some_and(hit)
    }

    fn matches_assignee(&self, control: &Control) -> bool {
        if self.assignee.is_empty() {
            return true;
        }
        match control.assignee() {
            Some(id) => self.assignee.contains(id),
            None => self.assignee.contains(UNASSIGNED),
        }
    }

    fn matches_due_date(&self, control: &Control) -> bool {
        match self.date_range {
            None => true,
            Some(range) if range.is_open() => true,
            Some(range) => control
                .estimated_completion_date
                .is_some_and(|due| range.contains(due.date_naive())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ControlDraft;
    use chrono::{TimeZone, Utc};

    fn control(id: &str) -> Control {
        Control::from_draft(id, ControlDraft::new(format!("DCF-{id}"), format!("Control {id}")))
    }

    fn ids<'a>(controls: &[&'a Control]) -> Vec<&'a str> {
        controls.iter().map(|c| c.id.as_str()).collect()
    }

    fn sample() -> Vec<Control> {
        let mut a = control("a");
        a.explanation = "Rotate **access keys** quarterly".into();
        a.tags = vec!["IAM".into()];
        a.assignee_id = Some("t1".into());
        a.priority_level = Some(PriorityLevel::High);
        a.estimated_completion_date = Some(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap());

        let mut b = control("b");
        b.status = ControlStatus::InReview;
        b.ticket_number = Some("SEC-1042".into());
        b.company = Company::Bgc;
        b.estimated_completion_date = Some(Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap());

        let c = control("c");
        vec![a, b, c]
    }

    #[test]
    fn empty_filters_match_everything() {
        let controls = sample();
        let filters = ControlFilters::default();
        assert!(!filters.is_active());
        assert_eq!(ids(&filters.apply(&controls)), ["a", "b", "c"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let controls = sample();
        let search = |text: &str| {
            let filters = ControlFilters { search: text.into(), ..Default::default() };
            ids(&filters.apply(&controls)).into_iter().map(str::to_string).collect::<Vec<_>>()
        };
        assert_eq!(search("ACCESS KEYS"), ["a"]);
        assert_eq!(search("iam"), ["a"]);
        assert_eq!(search("sec-10"), ["b"]);
        assert_eq!(search("dcf-c"), ["c"]);
        assert_eq!(search("  "), ["a", "b", "c"]);
    }

    #[test]
    fn unassigned_token_selects_controls_without_assignee() {
        let controls = sample();
        let mut filters = ControlFilters::default();
        filters.assignee.insert(UNASSIGNED.into());
        assert_eq!(ids(&filters.apply(&controls)), ["b", "c"]);

        filters.assignee.insert("t1".into());
        assert_eq!(ids(&filters.apply(&controls)), ["a", "b", "c"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let controls = sample();
        let mut filters = ControlFilters::default();
        filters.status.insert(ControlStatus::InProgress);
        filters.priority.insert(PriorityLevel::High);
        assert_eq!(ids(&filters.apply(&controls)), ["a"]);

        filters.company.insert(Company::Bgc);
        assert!(filters.apply(&controls).is_empty());
    }

    #[test]
    fn date_range_is_inclusive_and_excludes_undated() {
        let controls = sample();
        let filters = ControlFilters {
            date_range: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2025, 5, 1),
                end: NaiveDate::from_ymd_opt(2025, 5, 31),
            }),
            ..Default::default()
        };
        assert!(filters.is_active());
        assert_eq!(ids(&filters.apply(&controls)), ["a", "b"]);

        let open_ended = ControlFilters {
            date_range: Some(DateRange { start: NaiveDate::from_ymd_opt(2025, 5, 2), end: None }),
            ..Default::default()
        };
        assert_eq!(ids(&open_ended.apply(&controls)), ["b"]);
    }
}
