//! Connection broker proxy module
//!
//! This module provides the authenticated-proxy call primitive consumed by
//! discovery and invocation. OAuth token acquisition and refresh live in the
//! external connection broker; the engine only speaks this call shape.

mod client;
mod types;

pub use client::{connection_id_for, ConnectionProxy, HttpBrokerProxy};
pub use types::{HttpMethod, ProxyRequest, ProxyResponse};
