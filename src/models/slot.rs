use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixed time-of-day interval shared by every course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

crate::impl_record!(Slot);

impl Slot {
    pub fn new(id: &str, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: id.to_string(),
            label: format!("{}–{}", start.format("%-H:%M"), end.format("%-H:%M")),
            start_time: start,
            end_time: end,
            created_at: None,
            updated_at: None,
        }
    }

    /// The standard 45-minute grid.
    pub fn default_day() -> Vec<Slot> {
        const STARTS: [u32; 6] = [9, 10, 11, 13, 14, 15];

        STARTS
            .iter()
            .enumerate()
            .filter_map(|(i, &hour)| {
                let start = NaiveTime::from_hms_opt(hour, 0, 0)?;
                let end = NaiveTime::from_hms_opt(hour, 45, 0)?;
                Some(Slot::new(&format!("slot-{}", i + 1), start, end))
            })
            .collect()
    }
}
