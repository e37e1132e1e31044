//! # Schedule Server
//!
//! HTTP server for SmartSchedule: HTML pages, the JSON schedule API and
//! static assets.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
mod handlers;
mod pages;
pub mod server;

pub use server::{AppState, Server, ServerConfig};
