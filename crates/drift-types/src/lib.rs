//! Foundation types for drift.
//!
//! Every other drift crate depends on `drift-types`. The types here describe
//! what a directory tree looks like once scanned and what went wrong along
//! the way, without any knowledge of how trees are walked or compared.
//!
//! # Key Types
//!
//! - [`Fingerprint`] -- Domain-separated BLAKE3 hash of a file's content
//! - [`FileRecord`] -- A scanned file: normalized relative path, fingerprint, location
//! - [`Warning`] / [`WarningKind`] -- Non-fatal conditions collected during a run

pub mod error;
pub mod fingerprint;
pub mod record;
pub mod warning;

pub use error::TypeError;
pub use fingerprint::{Fingerprint, FingerprintHasher};
pub use record::{normalize_relative_path, FileRecord};
pub use warning::{Warning, WarningKind};
