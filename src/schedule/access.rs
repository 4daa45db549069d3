use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CourseFormat, LectureOccurrence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    NotYetAvailable,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum Access {
    Open,
    Locked(LockReason),
    /// Not enough information to decide. Treated as locked.
    Unknown,
}

/// Decide whether an occurrence can be opened on `today`.
///
/// Comparison is by calendar date only; the slot's time of day plays no part.
pub fn evaluate(
    occurrence: Option<&LectureOccurrence>,
    format: Option<CourseFormat>,
    today: NaiveDate,
) -> Access {
    let Some(occurrence) = occurrence else {
        return Access::Unknown;
    };
    if occurrence.is_demo {
        return Access::Open;
    }
    let Some(format) = format else {
        return Access::Unknown;
    };

    let date = occurrence.scheduled_date;
    match format {
        CourseFormat::Recorded if today >= date => Access::Open,
        CourseFormat::Live if today == date => Access::Open,
        CourseFormat::Live if today > date => Access::Locked(LockReason::Expired),
        _ => Access::Locked(LockReason::NotYetAvailable),
    }
}

pub fn accessible(
    occurrence: Option<&LectureOccurrence>,
    format: Option<CourseFormat>,
    today: NaiveDate,
) -> bool {
    evaluate(occurrence, format, today) == Access::Open
}
