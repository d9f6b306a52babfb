//! HTTP surface for survey coverage planning.

pub mod api;
pub mod config;
pub mod state;
