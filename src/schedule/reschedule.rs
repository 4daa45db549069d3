use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::AppError;
use crate::models::{CourseFormat, LectureOccurrence};

/// Outcome of a successful reschedule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Target equals the current position; nothing to write.
    Unchanged(LectureOccurrence),
    Moved(LectureOccurrence),
}

impl Move {
    pub fn occurrence(&self) -> &LectureOccurrence {
        match self {
            Move::Unchanged(o) | Move::Moved(o) => o,
        }
    }

    pub fn into_occurrence(self) -> LectureOccurrence {
        match self {
            Move::Unchanged(o) | Move::Moved(o) => o,
        }
    }
}

/// Validate moving `occurrence_id` to (`new_date`, `new_slot_id`) against a
/// snapshot of every occurrence in the system.
///
/// Checks run in a fixed order and the first failure wins: existence, live
/// course, demo lecture, weekend, unknown slot, occupied slot.
pub fn plan_reschedule(
    occurrences: &[LectureOccurrence],
    format_of: impl Fn(&str) -> Option<CourseFormat>,
    slot_exists: impl Fn(&str) -> bool,
    occurrence_id: &str,
    new_date: NaiveDate,
    new_slot_id: &str,
) -> Result<Move, AppError> {
    let current = occurrences
        .iter()
        .find(|o| o.id == occurrence_id)
        .ok_or_else(|| AppError::NotFound(format!("occurrence {}", occurrence_id)))?;

    let format = format_of(&current.course_id)
        .ok_or_else(|| AppError::NotFound(format!("course {}", current.course_id)))?;
    if format != CourseFormat::Recorded {
        return Err(AppError::Forbidden("live courses cannot be rescheduled".into()));
    }

    if current.is_demo {
        return Err(AppError::Forbidden("demo lectures cannot be rescheduled".into()));
    }

    if matches!(new_date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(AppError::InvalidTarget("weekends not allowed".into()));
    }

    if !slot_exists(new_slot_id) {
        return Err(AppError::InvalidTarget("unknown slot".into()));
    }

    let occupied = occurrences.iter().any(|o| {
        o.id != current.id && o.scheduled_date == new_date && o.slot_id == new_slot_id
    });
    if occupied {
        return Err(AppError::Conflict("slot already occupied".into()));
    }

    if current.position() == (new_date, new_slot_id) {
        return Ok(Move::Unchanged(current.clone()));
    }

    let mut moved = current.clone();
    moved.scheduled_date = new_date;
    moved.slot_id = new_slot_id.to_string();
    moved.is_rescheduled = true;
    Ok(Move::Moved(moved))
}
