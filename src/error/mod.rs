//! Error module for the capability engine
//!
//! This module provides error types and handling utilities.

mod error;

pub use error::{EngineError, Result};
