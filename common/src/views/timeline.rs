use crate::model::{Control, ControlStatus};
use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::cmp::Ordering;

/// Timeline sections, in display and classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimelineBucket {
    Completed,
    Overdue,
    Today,
    ThisWeek,
    ThisMonth,
    Future,
    NoDueDate,
}

impl TimelineBucket {
    pub const ALL: [TimelineBucket; 7] = [
        TimelineBucket::Completed,
        TimelineBucket::Overdue,
        TimelineBucket::Today,
        TimelineBucket::ThisWeek,
        TimelineBucket::ThisMonth,
        TimelineBucket::Future,
        TimelineBucket::NoDueDate,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TimelineBucket::Completed => "Completed",
            TimelineBucket::Overdue => "Overdue",
            TimelineBucket::Today => "Today",
            TimelineBucket::ThisWeek => "This Week",
            TimelineBucket::ThisMonth => "This Month",
            TimelineBucket::Future => "Future",
            TimelineBucket::NoDueDate => "No Due Date",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGroup<'a> {
    pub bucket: TimelineBucket,
    pub controls: Vec<&'a Control>,
}

/// Day boundaries of the calendar containing `now`, as local wall-clock times.
struct Boundaries {
    today: NaiveDateTime,
    tomorrow: NaiveDateTime,
    next_week: NaiveDateTime,
    next_month: NaiveDateTime,
}

impl Boundaries {
    fn around<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let date = now.date_naive();
        let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN);
        Self {
            today: midnight(date),
            tomorrow: midnight(date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)),
            next_week: midnight(date.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX)),
            next_month: midnight(
                date.checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX),
            ),
        }
    }

    fn bucket(&self, due: NaiveDateTime) -> TimelineBucket {
        if due < self.today {
            TimelineBucket::Overdue
        } else if due < self.tomorrow {
            TimelineBucket::Today
        } else if due < self.next_week {
            TimelineBucket::ThisWeek
        } else if due < self.next_month {
            TimelineBucket::ThisMonth
        } else {
            TimelineBucket::Future
        }
    }
}

/// Places one control on the timeline as seen from `now`.
///
/// Completed controls go to `Completed` whatever their date. Otherwise the due
/// date, read in `now`'s timezone, is compared with midnight of `now`'s day.
pub fn classify<Tz: TimeZone>(control: &Control, now: &DateTime<Tz>) -> TimelineBucket {
    Boundaries::around(now).classify(control, &now.timezone())
}

impl Boundaries {
    fn classify<Tz: TimeZone>(&self, control: &Control, tz: &Tz) -> TimelineBucket {
        if control.status == ControlStatus::Complete {
            return TimelineBucket::Completed;
        }
        match control.estimated_completion_date {
            None => TimelineBucket::NoDueDate,
            Some(due) => self.bucket(due.with_timezone(tz).naive_local()),
        }
    }
}

fn by_due_date(a: &&Control, b: &&Control) -> Ordering {
    match (a.estimated_completion_date, b.estimated_completion_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Groups controls into timeline sections, each sorted by due date with
/// undated controls last. Empty sections are left out.
pub fn bucket_timeline<'a, Tz: TimeZone>(
    controls: impl IntoIterator<Item = &'a Control>,
    now: &DateTime<Tz>,
) -> Vec<TimelineGroup<'a>> {
    let boundaries = Boundaries::around(now);
    let tz = now.timezone();
    let mut groups: Vec<TimelineGroup<'a>> = TimelineBucket::ALL
        .iter()
        .map(|bucket| TimelineGroup {
            bucket: *bucket,
            controls: Vec::new(),
        })
        .collect();

    for control in controls {
        let bucket = boundaries.classify(control, &tz);
        groups[bucket as usize].controls.push(control);
    }

    for group in &mut groups {
        group.controls.sort_by(by_due_date);
    }
    groups.retain(|group| !group.controls.is_empty());
    groups
}
