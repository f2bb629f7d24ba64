//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners turn keys into fixed-size digests. The ring carves tokens out
//! of those digests, so every partitioner must produce exactly
//! [`DIGEST_LEN`] bytes and must be deterministic across processes.

use std::fmt;
use std::str::FromStr;

use md5::{Digest as _, Md5};

use crate::error::{Error, Result};
use crate::token::Token;

/// Length in bytes of every partitioner digest.
pub const DIGEST_LEN: usize = 16;

/// Raw digest output.
pub type Digest = [u8; DIGEST_LEN];

/// Digest primitive used for both ring construction and key lookup.
///
/// Stateless and `Copy`, so it can be shared across threads without
/// synchronization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Partitioner {
    /// MD5, the classic ketama digest.
    #[default]
    Md5,
    /// 128-bit XXH3, little-endian.
    Xxh3,
}

impl Partitioner {
    /// Digests `key` into 16 bytes.
    pub fn digest(&self, key: &[u8]) -> Digest {
        match self {
            Partitioner::Md5 => {
                let out = Md5::digest(key);
                let mut digest = [0u8; DIGEST_LEN];
                digest.copy_from_slice(&out);
                digest
            }
            Partitioner::Xxh3 => xxhash_rust::xxh3::xxh3_128(key).to_le_bytes(),
        }
    }

    /// Converts a key into its lookup token (first 4 digest bytes).
    pub fn partition(&self, key: &[u8]) -> Token {
        Token::from_digest(&self.digest(key), 0)
    }

    /// Returns the name of this partitioner.
    pub fn name(&self) -> &'static str {
        match self {
            Partitioner::Md5 => "md5",
            Partitioner::Xxh3 => "xxh3",
        }
    }
}

impl FromStr for Partitioner {
    type Err = Error;

    /// Resolves a digest name. Unknown names are reported as
    /// [`Error::HashingUnavailable`] so they surface at startup.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Partitioner::Md5),
            "xxh3" | "xxh3-128" | "xxh3_128" => Ok(Partitioner::Xxh3),
            other => Err(Error::HashingUnavailable(format!(
                "digest `{}` is not supported (expected `md5` or `xxh3`)",
                other
            ))),
        }
    }
}

impl fmt::Display for Partitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
