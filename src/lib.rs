//! Lecture scheduling and access control.
//!
//! Expands a course's weekly recurrence into dated lecture occurrences,
//! decides whether an occurrence can be opened on a given day, and moves
//! occurrences between slots without ever stacking two in the same slot.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod schedule;
pub mod services;
pub mod state;
pub mod store;
