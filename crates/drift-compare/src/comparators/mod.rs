//! Built-in comparators, one per [`FileCategory`](crate::FileCategory).

pub mod disassembly;
pub mod fingerprint;
pub mod ignore;
pub mod text;

pub use disassembly::DisassemblyComparator;
pub use fingerprint::FingerprintComparator;
pub use ignore::IgnoreComparator;
pub use text::TextComparator;
