pub mod collaborators;
pub mod retry;
pub mod schedule_service;

pub use collaborators::{CourseCatalog, EnrollmentProvider, StaticCatalog, StaticEnrollments, StoredCatalog, StoredEnrollments};
pub use retry::RetryPolicy;
pub use schedule_service::ScheduleService;
