#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use lecture_scheduler::config::SchedulerConfig;
use lecture_scheduler::models::{CourseFormat, CourseSpec, LectureRef, Slot, TeachingDay, WeeklyRecurrence};
use lecture_scheduler::services::{ScheduleService, StaticCatalog, StaticEnrollments};
use lecture_scheduler::store::{CollectionStore, MemoryBackend, StorageBackend, StoreError};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// Midday UTC on the given date.
pub fn at(s: &str) -> DateTime<Utc> {
    date(s).and_hms_opt(12, 0, 0).expect("valid time").and_utc()
}

pub fn slots() -> Vec<Slot> {
    [("slot1", 9), ("slot2", 10), ("slot3", 11)]
        .iter()
        .map(|(id, hour)| {
            Slot::new(
                id,
                NaiveTime::from_hms_opt(*hour, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(*hour, 45, 0).unwrap(),
            )
        })
        .collect()
}

pub fn spec(
    id: &str,
    format: CourseFormat,
    day: TeachingDay,
    slot_ids: &[&str],
    start: &str,
    total: u32,
    lectures: usize,
) -> CourseSpec {
    CourseSpec {
        id: id.to_string(),
        title: format!("Course {}", id),
        format,
        weekly_recurrence: WeeklyRecurrence {
            day_of_week: day,
            slot_ids: slot_ids.iter().map(|s| s.to_string()).collect(),
            start_date: date(start),
            total_occurrences: total,
        },
        ordered_lectures: (1..=lectures)
            .map(|i| LectureRef {
                id: format!("L{}", i),
                title: format!("Lecture {}", i),
            })
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

/// Recorded Monday course: slots 1 and 2 from 2025-03-03, four lectures.
pub fn monday_recorded(id: &str) -> CourseSpec {
    spec(id, CourseFormat::Recorded, TeachingDay::Monday, &["slot1", "slot2"], "2025-03-03", 4, 4)
}

pub fn test_config() -> SchedulerConfig {
    SchedulerConfig {
        storage_retry_backoff: Duration::from_millis(1),
        ..SchedulerConfig::default()
    }
}

pub async fn service_on(
    backend: Arc<dyn StorageBackend>,
    catalog: StaticCatalog,
    enrollments: StaticEnrollments,
    config: &SchedulerConfig,
) -> ScheduleService {
    let store = CollectionStore::new(backend);
    let service = ScheduleService::open(&store, Arc::new(catalog), Arc::new(enrollments), config)
        .await
        .expect("open service");
    service.register_slots(slots()).await.expect("register slots");
    service
}

pub async fn service(specs: Vec<CourseSpec>, enrollments: StaticEnrollments) -> ScheduleService {
    service_on(
        Arc::new(MemoryBackend::new()),
        StaticCatalog::new(specs),
        enrollments,
        &test_config(),
    )
    .await
}

/// Memory backend that can refuse writes: the next `fail_next` writes, or
/// every write once an outage budget set by `refuse_after` is spent.
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_next: AtomicUsize,
    accepted_before_outage: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for FlakyBackend {
    fn default() -> Self {
        Self {
            inner: MemoryBackend::new(),
            fail_next: AtomicUsize::new(0),
            accepted_before_outage: AtomicUsize::new(usize::MAX),
            writes: AtomicUsize::new(0),
        }
    }
}

impl FlakyBackend {
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Accept `n` more writes, then refuse all of them until `heal`.
    pub fn refuse_after(&self, n: usize) {
        self.accepted_before_outage.store(n, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.fail_next.store(0, Ordering::SeqCst);
        self.accepted_before_outage.store(usize::MAX, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for FlakyBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<(), StoreError> {
        let pending = self.fail_next.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_next.store(pending - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("write refused".into()));
        }
        let budget = self.accepted_before_outage.load(Ordering::SeqCst);
        if budget == 0 {
            return Err(StoreError::Backend("backend unavailable".into()));
        }
        if budget != usize::MAX {
            self.accepted_before_outage.store(budget - 1, Ordering::SeqCst);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, blob).await
    }
}
