use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::CourseFormat;

/// One dated instance of a lecture within a course's weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureOccurrence {
    pub id: String,
    pub course_id: String,
    pub lecture_id: String,
    pub slot_id: String,
    pub scheduled_date: NaiveDate,
    pub is_rescheduled: bool,
    pub is_demo: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

crate::impl_record!(LectureOccurrence);

impl LectureOccurrence {
    pub fn position(&self) -> (NaiveDate, &str) {
        (self.scheduled_date, self.slot_id.as_str())
    }
}

/// Occurrence joined with what a listing needs to render it.
#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceView {
    #[serde(flatten)]
    pub occurrence: LectureOccurrence,
    pub course_title: String,
    pub format: CourseFormat,
    pub lecture_title: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub accessible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    pub slot_id: String,
}
