//! # Schedule Core
//!
//! Core types and operations for SmartSchedule, the college class schedule.
//!
//! This crate holds everything that does not touch the disk or the network:
//! - The persisted [`ScheduleDocument`] and its records
//! - Lesson filtering ([`LessonQuery`])
//! - Lesson creation and deletion on a document
//! - The current-lesson lookup
//! - Common error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calendar;
pub mod document;
pub mod error;
pub mod query;
pub mod types;

pub use calendar::{current_lesson, day_name, CurrentLesson, WEEKDAYS};
pub use document::{ScheduleDocument, UNKNOWN_TIME_SLOT};
pub use error::{Error, Result};
pub use query::LessonQuery;
pub use types::*;
