//! Capability Discovery Module
//!
//! This module implements capability discovery for OAuth-connected REST
//! services: schema retrieval and parsing, heuristic endpoint probing,
//! semantic categorization, tool synthesis and the process-lifetime
//! capability cache.

pub mod cache;
pub mod classify;
pub mod probe;
pub mod schema;
pub mod service;
pub mod synthesize;
pub mod types;

pub use cache::*;
pub use classify::*;
pub use probe::*;
pub use schema::*;
pub use service::*;
pub use synthesize::*;
pub use types::*;
