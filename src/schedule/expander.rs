use chrono::{Datelike, Days, NaiveDate};

use crate::models::{LectureOccurrence, WeeklyRecurrence};

/// First date on or after `start` that falls on the recurrence day, or `None`
/// when that date lies past the end of the calendar.
pub fn first_meeting_date(recurrence: &WeeklyRecurrence) -> Option<NaiveDate> {
    let start = recurrence.start_date;
    let target = recurrence.day_of_week.weekday().num_days_from_monday();
    let current = start.weekday().num_days_from_monday();
    let offset = (7 + target - current) % 7;
    start.checked_add_days(Days::new(u64::from(offset)))
}

/// Expand a weekly recurrence into concrete occurrences.
///
/// Each meeting day consumes one lecture per configured slot, in order, until
/// either `total_occurrences` or the lecture list runs out. The first lecture
/// is the demo. Output is ordered by date, then by position in `slot_ids`.
/// Expansion stops early if the next meeting day would pass the last
/// representable date.
pub fn expand(
    course_id: &str,
    recurrence: &WeeklyRecurrence,
    lecture_ids: &[String],
) -> Vec<LectureOccurrence> {
    let total = (recurrence.total_occurrences as usize).min(lecture_ids.len());
    if recurrence.slot_ids.is_empty() || total == 0 {
        return Vec::new();
    }

    let Some(mut date) = first_meeting_date(recurrence) else {
        return Vec::new();
    };
    let mut occurrences = Vec::with_capacity(total);
    let mut lectures = lecture_ids.iter().take(total).enumerate();

    'weeks: loop {
        for slot_id in &recurrence.slot_ids {
            let Some((index, lecture_id)) = lectures.next() else {
                break 'weeks;
            };
            occurrences.push(LectureOccurrence {
                id: format!("{}-{:03}", course_id, index + 1),
                course_id: course_id.to_string(),
                lecture_id: lecture_id.clone(),
                slot_id: slot_id.clone(),
                scheduled_date: date,
                is_rescheduled: false,
                is_demo: index == 0,
                created_at: None,
                updated_at: None,
            });
        }
        match date.checked_add_days(Days::new(7)) {
            Some(next) => date = next,
            None => break,
        }
    }

    occurrences
}
