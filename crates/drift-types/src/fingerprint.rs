use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};

/// Domain tag prepended to every content hash.
const CONTENT_DOMAIN: &str = "drift-content-v1";

/// Content fingerprint of a single file.
///
/// A `Fingerprint` is the BLAKE3 hash of a domain tag followed by the file's
/// full byte content. Two files with equal fingerprints are treated as
/// byte-identical; the classifier never looks past a matching fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint an in-memory byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = FingerprintHasher::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Fingerprint everything a reader yields, streaming in fixed-size chunks.
    pub fn of_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut hasher = FingerprintHasher::new();
        hasher.update_reader(reader)?;
        Ok(hasher.finalize())
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Incremental, domain-separated fingerprint builder.
pub struct FingerprintHasher {
    inner: blake3::Hasher,
}

impl FingerprintHasher {
    const CHUNK: usize = 64 * 1024;

    /// Start a new hash seeded with the content domain tag.
    pub fn new() -> Self {
        let mut inner = blake3::Hasher::new();
        inner.update(CONTENT_DOMAIN.as_bytes());
        inner.update(b":");
        Self { inner }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Feed the remaining content of a reader.
    pub fn update_reader<R: Read>(&mut self, mut reader: R) -> io::Result<&mut Self> {
        let mut buf = vec![0u8; Self::CHUNK];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    self.inner.update(&buf[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self)
    }

    /// Finish and return the fingerprint.
    pub fn finalize(&self) -> Fingerprint {
        Fingerprint(*self.inner.finalize().as_bytes())
    }
}

impl Default for FingerprintHasher {
    fn default() -> Self {
        Self::new()
    }
}
