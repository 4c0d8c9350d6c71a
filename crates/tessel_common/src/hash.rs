//! Content hashing for the block image cache.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 hash of an embedded block image.
///
/// Composite blocks that embed the same SVG produce the same hash, so the
/// asset cache stores each distinct image once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes a byte slice with XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// Hashes the UTF-8 bytes of a string.
    pub fn of_str(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Returns the lowercase hex form, 32 characters long.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
