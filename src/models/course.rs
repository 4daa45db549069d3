use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseFormat {
    Live,
    Recorded,
}

/// Days a course may meet on. Weekends are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeachingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl TeachingDay {
    pub fn weekday(self) -> Weekday {
        match self {
            TeachingDay::Monday => Weekday::Mon,
            TeachingDay::Tuesday => Weekday::Tue,
            TeachingDay::Wednesday => Weekday::Wed,
            TeachingDay::Thursday => Weekday::Thu,
            TeachingDay::Friday => Weekday::Fri,
        }
    }
}

impl TryFrom<Weekday> for TeachingDay {
    type Error = Weekday;

    fn try_from(day: Weekday) -> Result<Self, Self::Error> {
        match day {
            Weekday::Mon => Ok(TeachingDay::Monday),
            Weekday::Tue => Ok(TeachingDay::Tuesday),
            Weekday::Wed => Ok(TeachingDay::Wednesday),
            Weekday::Thu => Ok(TeachingDay::Thursday),
            Weekday::Fri => Ok(TeachingDay::Friday),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecurrence {
    pub day_of_week: TeachingDay,
    pub slot_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub total_occurrences: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub format: CourseFormat,
    pub recurrence: WeeklyRecurrence,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

crate::impl_record!(Course);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureRef {
    pub id: String,
    pub title: String,
}

/// What the course catalog hands over when a schedule is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSpec {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub format: CourseFormat,
    pub weekly_recurrence: WeeklyRecurrence,
    pub ordered_lectures: Vec<LectureRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

crate::impl_record!(CourseSpec);

impl CourseSpec {
    pub fn course(&self) -> Course {
        Course {
            id: self.id.clone(),
            title: self.title.clone(),
            format: self.format,
            recurrence: self.weekly_recurrence.clone(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn lecture_ids(&self) -> Vec<String> {
        self.ordered_lectures.iter().map(|l| l.id.clone()).collect()
    }
}
