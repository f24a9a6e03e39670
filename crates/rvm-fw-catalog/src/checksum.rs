//! Archive checksums.
//!
//! RVM verifies downloads against an MD5 map, so every archive carries a
//! 128-bit MD5 digest stored as lowercase hex. Snapshots additionally use
//! SHA-256 to detect tampering (see [`crate::snapshot`]).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CatalogError, Result};

const CHUNK: usize = 64 * 1024;

/// MD5 digest of an archive, as 32 lowercase hex characters.
///
/// Serialized as the bare hex string; deserialization rejects anything
/// [`Checksum::from_hex`] would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Compute the MD5 of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        Checksum(hex_encode(&hasher.finalize()))
    }

    /// Compute the MD5 of a file, streaming it in chunks.
    pub fn of_file(path: &Path) -> Result<Self> {
        let io_err = |source| CatalogError::Checksum {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; CHUNK];
        loop {
            let n = file.read(&mut buf).map_err(io_err)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Checksum(hex_encode(&hasher.finalize())))
    }

    /// Wrap an existing hex digest.
    ///
    /// Returns `None` unless `hex` is 32 lowercase hex characters.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let valid = hex.len() == 32
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Checksum(hex.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Checksum {
    type Error = CatalogError;

    fn try_from(hex: String) -> Result<Self> {
        Checksum::from_hex(&hex).ok_or_else(|| CatalogError::InvalidSnapshot {
            detail: format!("'{hex}' is not an MD5 digest"),
        })
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 of `data` as lowercase hex.
pub(crate) fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
