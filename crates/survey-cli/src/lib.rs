//! Survey CLI - plan coverage for a survey area from the command line.
//!
//! Binaries:
//! - plan_survey: plan a pattern over an area file, optionally submitting
//!   the waypoints to a running survey server

pub mod client;
pub mod report;

pub use client::SurveyClient;
pub use report::{load_area, render, OutputFormat};
