//! Integration tests across the Sortie workspace
//!
//! This test suite validates:
//! - Raw snapshot documents flowing through ingest, detection and ranking
//! - The worked scheduling scenarios end to end
//! - Store persistence and coordinator workflows
//! - Configuration driving the engine

pub mod test_utils;

#[cfg(test)]
mod detection_scenarios;

#[cfg(test)]
mod coordinator_workflow_tests;
