//! Comparator dispatch for drift.
//!
//! Files whose fingerprints differ are routed by extension to a category,
//! and each category to a [`Comparator`]. Comparators never abort a run:
//! failures (missing disassembler, refused input, vanished file) are turned
//! into [`Warning`](drift_types::Warning)s and a "different" verdict by the
//! [`ComparatorRegistry`].
//!
//! # Key Types
//!
//! - [`FileCategory`] / [`CategoryTable`] -- Extension → category mapping
//! - [`Comparator`] -- Equality strategy for one category
//! - [`ComparatorRegistry`] / [`DispatchOutcome`] -- Category → comparator table
//! - [`Disassembler`] / [`ProcessDisassembler`] -- External disassembly capability
//! - [`VolatileFilter`] -- Strips per-build lines from disassembly output
//! - [`CompareConfig`] -- All tunables, deserializable from TOML

pub mod category;
pub mod comparator;
pub mod comparators;
pub mod config;
pub mod disasm;
pub mod error;
pub mod registry;
pub mod volatile;

pub use category::{CategoryTable, FileCategory};
pub use comparator::{Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
pub use comparators::{DisassemblyComparator, FingerprintComparator, IgnoreComparator, TextComparator};
pub use config::{CompareConfig, DisassemblerConfig, TextConfig};
pub use disasm::{Disassembler, ProcessDisassembler, UnavailableDisassembler};
pub use error::{CompareError, CompareResult, DisassemblyError};
pub use registry::{ComparatorRegistry, DispatchOutcome};
pub use volatile::VolatileFilter;
