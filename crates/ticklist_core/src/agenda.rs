//! Due-date agenda grouping.
//!
//! # Responsibility
//! - Classify tasks into presentation buckets relative to a reference day.
//! - Produce ordered, labeled sections ready for rendering.
//!
//! # Invariants
//! - Section order is fixed: Overdue, Today, Tomorrow, later dates
//!   ascending, No Date.
//! - Empty sections are never emitted.
//! - Equal due dates keep the caller's input order.

use crate::model::task::Task;
use chrono::NaiveDate;

/// Presentation bucket for one task relative to a reference day.
///
/// Later dates keep their identity as `OnDate(d)`, so two sections can never
/// collide even when their display labels would repeat across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBucket {
    /// Due strictly before the reference day.
    Overdue,
    /// Due on the reference day.
    Today,
    /// Due the day after the reference day.
    Tomorrow,
    /// Due on a later specific day.
    OnDate(NaiveDate),
    /// No due date set.
    NoDate,
}

impl DueBucket {
    /// Returns the display label for this bucket, e.g. `Mon 25 Aug`.
    pub fn label(&self) -> String {
        match self {
            Self::Overdue => "Overdue".to_string(),
            Self::Today => "Today".to_string(),
            Self::Tomorrow => "Tomorrow".to_string(),
            Self::OnDate(date) => date.format("%a %-d %b").to_string(),
            Self::NoDate => "No Date".to_string(),
        }
    }
}

/// One ordered group of tasks sharing a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaSection {
    pub bucket: DueBucket,
    pub tasks: Vec<Task>,
}

/// Classifies one optional due date against the reference day.
pub fn classify_due(due_date: Option<NaiveDate>, today: NaiveDate) -> DueBucket {
    let Some(date) = due_date else {
        return DueBucket::NoDate;
    };

    if date < today {
        DueBucket::Overdue
    } else if date == today {
        DueBucket::Today
    } else if today.succ_opt() == Some(date) {
        DueBucket::Tomorrow
    } else {
        DueBucket::OnDate(date)
    }
}

/// Groups tasks into ordered agenda sections.
///
/// Tasks are stable-sorted by due date with undated tasks last, classified
/// against `today`, and emitted as non-empty sections. Classification is
/// monotone in the sort key, so one pass over the sorted list yields the
/// fixed section order.
pub fn build_agenda(tasks: &[Task], today: NaiveDate) -> Vec<AgendaSection> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|task| due_sort_key(task.due_date));

    let mut sections: Vec<AgendaSection> = Vec::new();
    for task in ordered {
        let bucket = classify_due(task.due_date, today);
        match sections.last_mut() {
            Some(section) if section.bucket == bucket => section.tasks.push(task.clone()),
            _ => sections.push(AgendaSection {
                bucket,
                tasks: vec![task.clone()],
            }),
        }
    }

    sections
}

// Undated tasks sort after every dated task.
fn due_sort_key(due_date: Option<NaiveDate>) -> (u8, NaiveDate) {
    match due_date {
        Some(date) => (0, date),
        None => (1, NaiveDate::MAX),
    }
}
