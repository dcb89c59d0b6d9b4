//! Fixed-width digests for long alleles.
//!
//! Alleles at or above [`LONG_ALLELE_THRESHOLD`](crate::LONG_ALLELE_THRESHOLD)
//! characters are replaced by a digest in the storage key, so very long
//! insertions and deletions still produce keys of bounded length.

use std::fmt::{self, Display, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha512};

use crate::errors::CoreError;

/// The digest used for long alleles.
///
/// `Sha1` (lowercase hex, 40 characters) is the default and matches the
/// algorithm that populated existing variant collections. `Sha512t24u` is the
/// GA4GH truncated SHA-512 (first 24 bytes, base64url, 32 characters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha512t24u,
}

impl DigestAlgorithm {
    /// Number of characters the digest occupies in a storage key.
    pub const fn encoded_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha512t24u => 32,
        }
    }

    /// Append the encoded digest of `data` to `out`.
    pub fn write_digest(&self, data: &[u8], out: &mut String) {
        match self {
            DigestAlgorithm::Sha1 => {
                let hash = Sha1::digest(data);
                // writing into a String cannot fail
                let _ = write!(out, "{:x}", hash);
            }
            DigestAlgorithm::Sha512t24u => {
                let hash = Sha512::digest(data);
                base64_url::encode_to_string(&hash[..24], out);
            }
        }
    }

    /// Encoded digest of `data` as a new string.
    pub fn digest(&self, data: &[u8]) -> String {
        let mut out = String::with_capacity(self.encoded_len());
        self.write_digest(data, &mut out);
        out
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            "sha512t24u" => Ok(DigestAlgorithm::Sha512t24u),
            _ => Err(CoreError::UnknownDigestAlgorithm(s.to_string())),
        }
    }
}

impl Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => write!(f, "sha1"),
            DigestAlgorithm::Sha512t24u => write!(f, "sha512t24u"),
        }
    }
}
