use sha2::{Digest as _, Sha256};

/// Width of a [`Digest`] in bytes.
pub const DIGEST_LEN: usize = 32;

/// Fixed-width output of a [`Fingerprint`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Derives a deterministic digest from a long URL.
///
/// Implementations are distribution functions, not security primitives:
/// the same input must always produce the same digest and different inputs
/// should spread evenly over the digest space.
pub trait Fingerprint: Send + Sync + 'static {
    fn digest(&self, long_url: &str) -> Digest;
}

/// A [`Fingerprint`] backed by SHA-256 over the URL's UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprint;

impl Fingerprint for Sha256Fingerprint {
    fn digest(&self, long_url: &str) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(long_url.as_bytes());
        let output = hasher.finalize();

        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&output);
        Digest(bytes)
    }
}
