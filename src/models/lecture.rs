use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(default)]
    pub id: String,
    pub course_id: String,
    /// Catalog identifier, unique within the course.
    pub lecture_id: String,
    pub title: String,
    pub position: usize,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

crate::impl_record!(Lecture);
