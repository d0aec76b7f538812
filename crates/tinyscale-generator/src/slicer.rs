use crate::fingerprint::Digest;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use tinyscale_core::{Alias, ALIAS_LEN};

/// Characters of the base64 alphabet that are unsafe in a URL path segment.
const UNSAFE_CHARS: [char; 2] = ['+', '/'];
/// What unsafe characters are normalized into.
const SAFE_SUBSTITUTE: char = '_';

/// A digest encoded into a URL-safe string, ready to be sliced into aliases.
///
/// The digest is base64-encoded and `+`/`/` are rewritten to `_`, so every
/// character is in `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDigest(String);

impl EncodedDigest {
    pub fn new(digest: &Digest) -> Self {
        let encoded = STANDARD_NO_PAD.encode(digest.as_bytes());
        Self(normalize(&encoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slices the alias starting at `offset`.
    ///
    /// Returns `None` once `offset + ALIAS_LEN` runs past the end of the
    /// encoded string, which bounds the number of collision retries.
    pub fn candidate(&self, offset: usize) -> Option<Alias> {
        let end = offset.checked_add(ALIAS_LEN)?;
        self.0.get(offset..end).map(Alias::new_unchecked)
    }

    /// Number of distinct offsets [`candidate`](Self::candidate) accepts.
    pub fn max_attempts(&self) -> usize {
        (self.0.len() + 1).saturating_sub(ALIAS_LEN)
    }

    /// Iterates candidates from `start` until the encoded string is exhausted.
    pub fn candidates_from(&self, start: usize) -> Candidates<'_> {
        Candidates {
            encoded: self,
            offset: start,
        }
    }
}

/// Iterator over `(offset, alias)` pairs of an [`EncodedDigest`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    encoded: &'a EncodedDigest,
    offset: usize,
}

impl Iterator for Candidates<'_> {
    type Item = (usize, Alias);

    fn next(&mut self) -> Option<Self::Item> {
        let alias = self.encoded.candidate(self.offset)?;
        let offset = self.offset;
        self.offset += 1;
        Some((offset, alias))
    }
}

fn normalize(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) {
                SAFE_SUBSTITUTE
            } else {
                c
            }
        })
        .collect()
}
