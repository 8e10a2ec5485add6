//! Configuration module for the capability engine
//!
//! This module provides configuration management and loading utilities.

mod config;

pub use config::{BrokerConfig, Config, DiscoveryConfig, ProvidersConfig};
