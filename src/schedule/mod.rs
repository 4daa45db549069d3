//! Pure scheduling rules: expansion, accessibility and reschedule checks.
//! Nothing in here touches storage.

pub mod access;
pub mod expander;
pub mod reschedule;

pub use access::{Access, LockReason, accessible, evaluate};
pub use expander::{expand, first_meeting_date};
pub use reschedule::{Move, plan_reschedule};
