//! Tree scanner for drift.
//!
//! Walks a root directory, fingerprints every regular file beneath it on a
//! bounded pool of blocking workers, and returns an immutable [`Snapshot`].
//!
//! # Key Types
//!
//! - [`TreeScanner`] -- Walks and hashes one tree
//! - [`ScanConfig`] -- Worker pool sizing
//! - [`Snapshot`] -- Path → [`FileRecord`](drift_types::FileRecord) index of one tree

pub mod error;
pub mod scanner;
pub mod snapshot;

pub use error::{ScanError, ScanResult};
pub use scanner::{ScanConfig, TreeScanner};
pub use snapshot::Snapshot;
