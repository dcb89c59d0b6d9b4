//! Deterministic storage keys for variants.
//!
//! A key has the shape `{chromosome}_{position}_{ref}_{alt}`. Each allele part
//! is empty when the allele is missing (`-`), the allele itself when it is
//! shorter than [`LONG_ALLELE_THRESHOLD`], or a fixed-width digest otherwise.
//! Digest collisions are possible in principle but negligible in practice.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;

/// Alleles with at least this many characters are stored as a digest.
pub const LONG_ALLELE_THRESHOLD: usize = 50;

/// Placeholder the annotator uses for an absent allele (insertions, deletions).
pub const MISSING_ALLELE: &str = "-";

/// Identifier of a variant document in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

///
/// Builds storage keys with a configurable long-allele digest.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageKeyBuilder {
    algorithm: DigestAlgorithm,
}

impl StorageKeyBuilder {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    ///
    /// Compute the storage key of a variant.
    ///
    /// # Arguments
    /// - chromosome: chromosome name, validated by the caller
    /// - position: start position of the variant
    /// - reference: reference allele, `-` when absent
    /// - alternate: alternate allele, `-` when absent
    pub fn build(
        &self,
        chromosome: &str,
        position: u64,
        reference: &str,
        alternate: &str,
    ) -> StorageKey {
        let mut position_buf = itoa::Buffer::new();
        let position = position_buf.format(position);

        let capacity = chromosome.len()
            + position.len()
            + 3
            + self.allele_part_len(reference)
            + self.allele_part_len(alternate);

        let mut key = String::with_capacity(capacity);
        key.push_str(chromosome);
        key.push('_');
        key.push_str(position);
        key.push('_');
        self.push_allele(&mut key, reference);
        key.push('_');
        self.push_allele(&mut key, alternate);

        StorageKey(key)
    }

    fn allele_part_len(&self, allele: &str) -> usize {
        if allele == MISSING_ALLELE {
            0
        } else if !is_long_allele(allele) {
            allele.len()
        } else {
            self.algorithm.encoded_len()
        }
    }

    fn push_allele(&self, key: &mut String, allele: &str) {
        if allele == MISSING_ALLELE {
            return;
        }
        if !is_long_allele(allele) {
            key.push_str(allele);
        } else {
            self.algorithm.write_digest(allele.as_bytes(), key);
        }
    }
}

/// Length is counted in characters, not bytes.
fn is_long_allele(allele: &str) -> bool {
    allele.len() >= LONG_ALLELE_THRESHOLD && allele.chars().count() >= LONG_ALLELE_THRESHOLD
}

/// Storage key using the default (SHA-1) digest for long alleles.
pub fn build_storage_key(
    chromosome: &str,
    position: u64,
    reference: &str,
    alternate: &str,
) -> StorageKey {
    StorageKeyBuilder::default().build(chromosome, position, reference, alternate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("20", 60343, "G", "A", "20_60343_G_A")]
    #[case("20", 60343, "-", "-", "20_60343__")]
    #[case("20", 60343, "-", "A", "20_60343__A")]
    #[case("X", 1, "AC", "-", "X_1_AC_")]
    #[case("MT", 0, "T", "TTTA", "MT_0_T_TTTA")]
    fn test_build_storage_key(
        #[case] chromosome: &str,
        #[case] position: u64,
        #[case] reference: &str,
        #[case] alternate: &str,
        #[case] expected: &str,
    ) {
        let key = build_storage_key(chromosome, position, reference, alternate);
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_allele_just_below_threshold_is_verbatim() {
        let allele = "A".repeat(LONG_ALLELE_THRESHOLD - 1);
        let key = build_storage_key("1", 100, &allele, "-");
        assert_eq!(key.as_str(), format!("1_100_{}_", allele));
    }

    #[test]
    fn test_allele_at_threshold_is_digested() {
        let allele = "A".repeat(LONG_ALLELE_THRESHOLD);
        let key = build_storage_key("1", 100, &allele, "-");
        let expected = format!("1_100_{}_", DigestAlgorithm::Sha1.digest(allele.as_bytes()));
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_multibyte_allele_below_threshold_is_verbatim() {
        let allele = "é".repeat(30);
        let key = build_storage_key("1", 1, &allele, "-");
        assert_eq!(key.as_str(), format!("1_1_{}_", allele));
    }

    #[test]
    fn test_multibyte_allele_at_threshold_is_digested() {
        let allele = "é".repeat(LONG_ALLELE_THRESHOLD);
        let key = build_storage_key("1", 1, &allele, "-");
        let expected = format!("1_1_{}_", DigestAlgorithm::Sha1.digest(allele.as_bytes()));
        assert_eq!(key.as_str(), expected);
    }

    #[rstest]
    #[case(DigestAlgorithm::Sha1)]
    #[case(DigestAlgorithm::Sha512t24u)]
    fn test_long_allele_part_length_is_bounded(#[case] algorithm: DigestAlgorithm) {
        let builder = StorageKeyBuilder::new(algorithm);
        for len in [50, 51, 500, 10_000] {
            let reference = "ACGT".repeat(len).chars().take(len).collect::<String>();
            let key = builder.build("2", 12345, &reference, "G");
            // base64url digests may contain `_`, so compare lengths instead of splitting
            assert!(key.as_str().starts_with("2_12345_"));
            assert!(key.as_str().ends_with("_G"));
            assert_eq!(key.as_str().len(), "2_12345__G".len() + algorithm.encoded_len());
        }
    }

    #[test]
    fn test_storage_key_is_deterministic() {
        let long = "ACGTTGCA".repeat(20);
        let first = build_storage_key("22", 16050075, &long, &long[1..]);
        let second = build_storage_key("22", 16050075, &long, &long[1..]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_long_alleles_give_distinct_keys() {
        let a = "A".repeat(60);
        let mut b = a.clone();
        b.replace_range(59..60, "C");
        assert_ne!(
            build_storage_key("1", 10, &a, "-"),
            build_storage_key("1", 10, &b, "-")
        );
    }

    #[test]
    fn test_storage_key_display_and_into_string() {
        let key = build_storage_key("20", 60343, "G", "A");
        assert_eq!(key.to_string(), "20_60343_G_A");
        assert_eq!(String::from(key), "20_60343_G_A");
    }
}
