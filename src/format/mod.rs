//! Response shaping module
//!
//! Turns raw API responses into concise human-readable summaries and
//! failures into actionable remediation text.

pub mod advisor;
pub mod response;

pub use advisor::*;
pub use response::*;
