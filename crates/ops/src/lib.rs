//! Operations layer for Sortie
//!
//! Everything that sits between an operator and the scheduling engine:
//! - `store`: keyed records loaded from and saved to a JSON snapshot
//! - `intent`: the commands an operator can issue
//! - `coordinator`: executes commands against the store and engine

pub mod coordinator;
pub mod error;
pub mod intent;
pub mod store;

pub use coordinator::Coordinator;
pub use error::{OpsError, Result};
pub use intent::{Command, CommandOutcome};
pub use store::{RecordStore, SnapshotDocument, StatusSummary};
