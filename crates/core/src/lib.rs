//! Core functionality shared across the Sortie workspace.
//!
//! This crate provides the configuration model, logging initialisation and
//! the common error type used by the outer layers (store, CLI). Engine
//! defaults such as the suggestion count are taken from `sortie-scheduler`.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, EngineConfig, LoggingConfig, StoreConfig, DEFAULT_TOP_K};
pub use error::{Error, Result};
