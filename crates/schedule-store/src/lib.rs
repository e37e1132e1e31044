//! # Schedule Store
//!
//! Persistence for SmartSchedule.
//!
//! The schedule lives in a single JSON document that is read in full on every
//! request and rewritten in full on every change.
//!
//! ## Components
//!
//! - **Stores**: [`JsonFileStore`] for the backing file, [`InMemoryStore`] for tests
//! - **Schedule**: the load, operate, save cycle behind every request

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod schedule;
pub mod store;

pub use schedule::{LessonListing, Schedule};
pub use store::{DocumentStore, InMemoryStore, JsonFileStore};
