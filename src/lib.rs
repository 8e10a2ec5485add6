//! apiweaver - Capability discovery and tool synthesis for OAuth-connected
//! REST services
//!
//! This crate turns an unknown third-party API surface into a set of named,
//! callable tools without per-service integration code: it fetches or
//! probes for endpoints through an external connection broker, categorizes
//! them, synthesizes tools, routes free-text actions to the best match and
//! shapes responses and failures into readable advisories.

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod format;
pub mod proxy;
pub mod routing;

pub use config::Config;
pub use engine::{Engine, InvokeOutcome};
pub use error::{EngineError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
