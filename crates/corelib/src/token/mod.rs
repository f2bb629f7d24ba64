//! Token abstraction module for consistent hashing.
//!
//! Tokens are positions on a 32-bit hash ring. Every token is carved out of a
//! 16-byte digest: one digest holds four 4-byte groups, each read as a
//! little-endian `u32`.

use std::fmt;

use crate::partitioner::{Digest, DIGEST_LEN};

/// Number of tokens a single digest yields.
pub const TOKENS_PER_DIGEST: usize = DIGEST_LEN / 4;

/// Position on the 32-bit ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(pub u32);

impl Token {
    /// Minimum token value (start of ring).
    pub const MIN: Token = Token(0);
    /// Maximum token value (end of ring).
    pub const MAX: Token = Token(u32::MAX);

    /// Reads the `group`-th 4-byte window of `digest` as a little-endian `u32`.
    ///
    /// # Panics
    ///
    /// Panics if `group >= TOKENS_PER_DIGEST`.
    #[inline]
    pub fn from_digest(digest: &Digest, group: usize) -> Self {
        let start = group * 4;
        Token(u32::from_le_bytes([
            digest[start],
            digest[start + 1],
            digest[start + 2],
            digest[start + 3],
        ]))
    }

    /// All four tokens of a digest, in group order.
    pub fn all_from_digest(digest: &Digest) -> [Token; TOKENS_PER_DIGEST] {
        std::array::from_fn(|group| Token::from_digest(digest, group))
    }

    /// Clockwise distance from `self` to `other` on the ring.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        other.0.wrapping_sub(self.0)
    }

    /// The next position clockwise, or `None` at the end of the ring.
    #[inline]
    pub fn successor(&self) -> Option<Token> {
        self.0.checked_add(1).map(Token)
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
