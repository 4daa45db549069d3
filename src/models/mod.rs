pub mod course;
pub mod enrollment;
pub mod lecture;
pub mod occurrence;
pub mod slot;

pub use course::{Course, CourseFormat, CourseSpec, LectureRef, TeachingDay, WeeklyRecurrence};
pub use enrollment::Enrollment;
pub use lecture::Lecture;
pub use occurrence::{LectureOccurrence, OccurrenceView, RescheduleRequest};
pub use slot::Slot;
