//! Parse errors for planner inputs.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error("unknown coverage pattern '{0}' (expected grid, crosshatch or perimeter)")]
    UnknownPattern(String),

    #[error("invalid survey area: {0}")]
    InvalidArea(String),

    #[error("vertex {index} is not a [longitude, latitude] pair: {reason}")]
    InvalidVertex { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
