//! Deterministic alias derivation.
//!
//! A long URL is hashed once by a [`Fingerprint`] into a fixed-width
//! [`Digest`]; the digest is encoded into an [`EncodedDigest`] from which
//! fixed-width alias candidates are sliced at increasing offsets.

pub mod fingerprint;
pub mod slicer;

pub use fingerprint::{Digest, Fingerprint, Sha256Fingerprint, DIGEST_LEN};
pub use slicer::{Candidates, EncodedDigest};
