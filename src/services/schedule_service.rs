use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::error::AppError;
use crate::models::{Course, CourseFormat, Lecture, LectureOccurrence, OccurrenceView, Slot};
use crate::schedule::{Move, accessible, expand, plan_reschedule};
use crate::services::{CourseCatalog, EnrollmentProvider, RetryPolicy};
use crate::store::{Collection, CollectionStore};

/// Sole writer of courses, lectures and occurrences.
pub struct ScheduleService {
    courses: Collection<Course>,
    lectures: Collection<Lecture>,
    occurrences: Collection<LectureOccurrence>,
    slots: Collection<Slot>,
    catalog: Arc<dyn CourseCatalog>,
    enrollments: Arc<dyn EnrollmentProvider>,
    retry: RetryPolicy,
    utc_offset: FixedOffset,
    /// Serializes schedule generation and course deletion.
    lifecycle: Mutex<()>,
}

impl ScheduleService {
    pub async fn open(
        store: &CollectionStore,
        catalog: Arc<dyn CourseCatalog>,
        enrollments: Arc<dyn EnrollmentProvider>,
        config: &SchedulerConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            courses: store.open("courses").await?,
            lectures: store.open("lectures").await?,
            occurrences: store.open("occurrences").await?,
            slots: store.open("slots").await?,
            catalog,
            enrollments,
            retry: RetryPolicy::storage(config.storage_retry_backoff),
            utc_offset: config.utc_offset,
            lifecycle: Mutex::new(()),
        })
    }

    /// Calendar date of `now` in the configured offset.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    /// Add any slot whose id is not registered yet; returns how many were added.
    pub async fn register_slots(&self, slots: Vec<Slot>) -> Result<usize, AppError> {
        self.retry
            .run("register_slots", || {
                let slots = slots.clone();
                async move {
                    self.slots
                        .transact(|batch| {
                            let mut added = 0;
                            for slot in slots {
                                if batch.get(&slot.id).is_none() {
                                    batch.insert(slot)?;
                                    added += 1;
                                }
                            }
                            Ok::<_, AppError>(added)
                        })
                        .await
                }
            })
            .await
    }

    pub async fn slots(&self) -> Vec<Slot> {
        self.slots.get_all().await
    }

    pub async fn get_occurrence(&self, occurrence_id: &str) -> Option<LectureOccurrence> {
        self.occurrences.get_by_id(occurrence_id).await
    }

    /// Expand the catalog's recurrence spec for `course_id` and persist the
    /// course, its lectures and its occurrences. A course is scheduled once.
    ///
    /// The course record is written before any occurrence, so whatever a
    /// failed generation leaves behind can still be removed by
    /// [`delete_course`](Self::delete_course) or completed by generating again.
    pub async fn generate_schedule(&self, course_id: &str) -> Result<Vec<LectureOccurrence>, AppError> {
        let spec = self
            .catalog
            .get_course_recurrence_spec(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("course spec {}", course_id)))?;

        let known_slots: HashSet<String> = self.slots.get_all().await.into_iter().map(|s| s.id).collect();
        if let Some(unknown) = spec.weekly_recurrence.slot_ids.iter().find(|s| !known_slots.contains(*s)) {
            return Err(AppError::InvalidTarget(format!("unknown slot {}", unknown)));
        }

        let _lifecycle = self.lifecycle.lock().await;

        if !self.occurrences.query(|o| o.course_id == course_id).await.is_empty() {
            return Err(AppError::Conflict(format!("course {} already has a schedule", course_id)));
        }

        let lecture_ids = spec.lecture_ids();
        let generated = expand(course_id, &spec.weekly_recurrence, &lecture_ids);

        let course = spec.course();
        let lectures: Vec<Lecture> = spec
            .ordered_lectures
            .iter()
            .enumerate()
            .map(|(i, l)| Lecture {
                id: String::new(),
                lecture_id: l.id.clone(),
                course_id: course_id.to_string(),
                title: l.title.clone(),
                position: i,
                created_at: None,
                updated_at: None,
            })
            .collect();

        self.retry
            .run("generate_schedule", || self.insert_course(&course, &lectures))
            .await?;

        let inserted = self
            .retry
            .run("generate_schedule", || self.insert_occurrences(course_id, &generated))
            .await;
        let occurrences = match inserted {
            Ok(occurrences) => occurrences,
            Err(err) => {
                let undo = self
                    .retry
                    .run("generate_schedule", || self.remove_course_records(course_id))
                    .await;
                if let Err(undo) = undo {
                    error!(course_id, "failed to roll back course after failed generation: {}", undo);
                }
                return Err(err);
            }
        };

        info!(course_id, count = occurrences.len(), format = ?spec.format, "generated schedule");
        Ok(occurrences)
    }

    async fn insert_occurrences(
        &self,
        course_id: &str,
        generated: &[LectureOccurrence],
    ) -> Result<Vec<LectureOccurrence>, AppError> {
        self.occurrences
            .transact(|batch| {
                if batch.records().iter().any(|o| o.course_id == course_id) {
                    return Err(AppError::Conflict(format!("course {} already has a schedule", course_id)));
                }
                let taken: HashSet<(NaiveDate, &str)> = batch.records().iter().map(|o| o.position()).collect();
                if let Some(clash) = generated.iter().find(|o| taken.contains(&o.position())) {
                    return Err(AppError::Conflict(format!(
                        "slot {} on {} already occupied",
                        clash.slot_id, clash.scheduled_date
                    )));
                }

                let mut inserted = Vec::with_capacity(generated.len());
                for occurrence in generated {
                    inserted.push(batch.insert(occurrence.clone())?);
                }
                Ok(inserted)
            })
            .await
    }

    async fn insert_course(&self, course: &Course, lectures: &[Lecture]) -> Result<(), AppError> {
        self.courses
            .transact(|batch| {
                if batch.get(&course.id).is_none() {
                    batch.insert(course.clone())?;
                }
                Ok::<_, AppError>(())
            })
            .await?;
        self.lectures
            .transact(|batch| {
                batch.retain(|l| l.course_id != course.id);
                for lecture in lectures {
                    batch.insert(lecture.clone())?;
                }
                Ok::<_, AppError>(())
            })
            .await
    }

    async fn remove_course_records(&self, course_id: &str) -> Result<(), AppError> {
        self.occurrences
            .transact(|batch| Ok::<_, AppError>(batch.retain(|o| o.course_id != course_id)))
            .await?;
        self.lectures
            .transact(|batch| Ok::<_, AppError>(batch.retain(|l| l.course_id != course_id)))
            .await?;
        self.courses.remove(course_id).await?;
        Ok(())
    }

    /// Occurrences of one course, sorted by date then slot start time.
    pub async fn list_occurrences(
        &self,
        course_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<OccurrenceView>, AppError> {
        if self.courses.get_by_id(course_id).await.is_none() {
            return Err(AppError::NotFound(format!("course {}", course_id)));
        }
        let occurrences = self.occurrences.query(|o| o.course_id == course_id).await;
        Ok(self.views(occurrences, now).await)
    }

    /// Occurrences from today onward across the user's active courses.
    pub async fn list_upcoming(
        &self,
        user_id: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<OccurrenceView>, AppError> {
        let course_ids = self.enrollments.active_course_ids(user_id).await?;
        let today = self.today(now);

        let occurrences = self
            .occurrences
            .query(|o| course_ids.contains(&o.course_id) && o.scheduled_date >= today)
            .await;

        let mut views = self.views(occurrences, now).await;
        views.truncate(limit);
        Ok(views)
    }

    /// Unknown occurrences and courses are never accessible.
    pub async fn is_accessible(&self, occurrence_id: &str, now: DateTime<Utc>) -> bool {
        let occurrence = self.occurrences.get_by_id(occurrence_id).await;
        let format = match &occurrence {
            Some(o) => self.courses.get_by_id(&o.course_id).await.map(|c| c.format),
            None => None,
        };
        accessible(occurrence.as_ref(), format, self.today(now))
    }

    pub async fn reschedule(
        &self,
        occurrence_id: &str,
        new_date: NaiveDate,
        new_slot_id: &str,
    ) -> Result<LectureOccurrence, AppError> {
        let result = self
            .retry
            .run("reschedule", || self.try_reschedule(occurrence_id, new_date, new_slot_id))
            .await;

        match &result {
            Ok(o) => info!(occurrence_id, date = %o.scheduled_date, slot = %o.slot_id, "rescheduled occurrence"),
            Err(err) if !err.is_retryable() => {
                warn!(occurrence_id, date = %new_date, slot = new_slot_id, "reschedule rejected: {}", err)
            }
            Err(_) => {}
        }
        result
    }

    async fn try_reschedule(
        &self,
        occurrence_id: &str,
        new_date: NaiveDate,
        new_slot_id: &str,
    ) -> Result<LectureOccurrence, AppError> {
        let formats: HashMap<String, CourseFormat> = self
            .courses
            .get_all()
            .await
            .into_iter()
            .map(|c| (c.id, c.format))
            .collect();
        let slot_ids: HashSet<String> = self.slots.get_all().await.into_iter().map(|s| s.id).collect();

        self.occurrences
            .transact(|batch| {
                let planned = plan_reschedule(
                    batch.records(),
                    |course_id| formats.get(course_id).copied(),
                    |slot_id| slot_ids.contains(slot_id),
                    occurrence_id,
                    new_date,
                    new_slot_id,
                )?;

                match planned {
                    Move::Unchanged(current) => Ok(current),
                    Move::Moved(moved) => {
                        let id = moved.id.clone();
                        batch
                            .update(&id, move |o| *o = moved)
                            .ok_or_else(|| AppError::NotFound(format!("occurrence {}", id)))
                    }
                }
            })
            .await
    }

    /// Remove a course together with its lectures and occurrences. Lectures
    /// or occurrences left behind without a course record are removed too.
    pub async fn delete_course(&self, course_id: &str) -> Result<(), AppError> {
        let _lifecycle = self.lifecycle.lock().await;

        let known = self.courses.get_by_id(course_id).await.is_some()
            || !self.occurrences.query(|o| o.course_id == course_id).await.is_empty()
            || !self.lectures.query(|l| l.course_id == course_id).await.is_empty();
        if !known {
            return Err(AppError::NotFound(format!("course {}", course_id)));
        }

        self.retry
            .run("delete_course", || self.remove_course_records(course_id))
            .await?;

        info!(course_id, "deleted course");
        Ok(())
    }

    async fn views(&self, occurrences: Vec<LectureOccurrence>, now: DateTime<Utc>) -> Vec<OccurrenceView> {
        let today = self.today(now);
        let courses: HashMap<String, Course> = self
            .courses
            .get_all()
            .await
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let lectures: HashMap<(String, String), String> = self
            .lectures
            .get_all()
            .await
            .into_iter()
            .map(|l| ((l.course_id, l.lecture_id), l.title))
            .collect();
        let slots: HashMap<String, Slot> = self
            .slots
            .get_all()
            .await
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let mut views: Vec<OccurrenceView> = occurrences
            .into_iter()
            .filter_map(|occurrence| {
                let course = courses.get(&occurrence.course_id)?;
                let slot = slots.get(&occurrence.slot_id);
                Some(OccurrenceView {
                    course_title: course.title.clone(),
                    format: course.format,
                    lecture_title: lectures
                        .get(&(occurrence.course_id.clone(), occurrence.lecture_id.clone()))
                        .cloned(),
                    start_time: slot.map(|s| s.start_time),
                    end_time: slot.map(|s| s.end_time),
                    accessible: accessible(Some(&occurrence), Some(course.format), today),
                    occurrence,
                })
            })
            .collect();

        // Unknown slots sort after known ones on the same day.
        views.sort_by(|a, b| {
            (a.occurrence.scheduled_date, a.start_time.is_none(), a.start_time, &a.occurrence.slot_id).cmp(&(
                b.occurrence.scheduled_date,
                b.start_time.is_none(),
                b.start_time,
                &b.occurrence.slot_id,
            ))
        });
        views
    }
}
