use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{CourseSpec, Enrollment};
use crate::store::Collection;

/// Source of the courses a learner is currently enrolled in.
#[async_trait]
pub trait EnrollmentProvider: Send + Sync {
    async fn active_course_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError>;
}

/// Source of recurrence specs, read once when a schedule is generated.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn get_course_recurrence_spec(&self, course_id: &str) -> Result<Option<CourseSpec>, AppError>;
}

/// Fixed enrollments, for tests and demos.
#[derive(Default)]
pub struct StaticEnrollments {
    by_user: HashMap<String, HashSet<String>>,
}

impl StaticEnrollments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user_id: &str, course_id: &str) -> Self {
        self.by_user
            .entry(user_id.to_string())
            .or_default()
            .insert(course_id.to_string());
        self
    }
}

#[async_trait]
impl EnrollmentProvider for StaticEnrollments {
    async fn active_course_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        Ok(self.by_user.get(user_id).cloned().unwrap_or_default())
    }
}

/// Fixed catalog, for tests and demos.
#[derive(Default)]
pub struct StaticCatalog {
    specs: HashMap<String, CourseSpec>,
}

impl StaticCatalog {
    pub fn new(specs: impl IntoIterator<Item = CourseSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

#[async_trait]
impl CourseCatalog for StaticCatalog {
    async fn get_course_recurrence_spec(&self, course_id: &str) -> Result<Option<CourseSpec>, AppError> {
        Ok(self.specs.get(course_id).cloned())
    }
}

/// Enrollments kept in the `enrollments` collection.
pub struct StoredEnrollments {
    enrollments: Collection<Enrollment>,
}

impl StoredEnrollments {
    pub fn new(enrollments: Collection<Enrollment>) -> Self {
        Self { enrollments }
    }

    pub async fn enroll(&self, user_id: &str, course_id: &str) -> Result<Enrollment, AppError> {
        let enrollment = Enrollment {
            id: String::new(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            active: true,
            created_at: None,
            updated_at: None,
        };
        Ok(self.enrollments.create(enrollment).await?)
    }

    /// Marks every enrollment of the user in the course inactive.
    pub async fn withdraw(&self, user_id: &str, course_id: &str) -> Result<usize, AppError> {
        let ids: Vec<String> = self
            .enrollments
            .query(|e| e.user_id == user_id && e.course_id == course_id && e.active)
            .await
            .into_iter()
            .map(|e| e.id)
            .collect();

        for id in &ids {
            self.enrollments.update(id, |e| e.active = false).await?;
        }
        Ok(ids.len())
    }
}

#[async_trait]
impl EnrollmentProvider for StoredEnrollments {
    async fn active_course_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        Ok(self
            .enrollments
            .query(|e| e.user_id == user_id && e.active)
            .await
            .into_iter()
            .map(|e| e.course_id)
            .collect())
    }
}

/// Course specs kept in the `course_specs` collection.
pub struct StoredCatalog {
    specs: Collection<CourseSpec>,
}

impl StoredCatalog {
    pub fn new(specs: Collection<CourseSpec>) -> Self {
        Self { specs }
    }

    pub async fn publish(&self, spec: CourseSpec) -> Result<CourseSpec, AppError> {
        Ok(self.specs.create(spec).await?)
    }
}

#[async_trait]
impl CourseCatalog for StoredCatalog {
    async fn get_course_recurrence_spec(&self, course_id: &str) -> Result<Option<CourseSpec>, AppError> {
        Ok(self.specs.get_by_id(course_id).await)
    }
}
