//! Action routing module
//!
//! Maps free-text action phrases to synthesized tools and executes the
//! resolved endpoint through the connection broker.

pub mod executor;
pub mod resolver;

pub use executor::*;
pub use resolver::*;
