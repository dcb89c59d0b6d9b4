use serde::{Deserialize, Serialize};

use super::consequence::ConsequenceType;
use super::xref::Xref;
use crate::storage_key::{StorageKey, StorageKeyBuilder};

///
/// One annotated variant, produced from a single line of annotator output.
///
/// Alleles use `-` for an absent allele, the same convention the annotator
/// writes for insertions and deletions.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub reference: String,
    pub alternate: String,
    pub consequence_types: Vec<ConsequenceType>,
    pub xrefs: Vec<Xref>,
}

impl AnnotationRecord {
    pub fn new(
        chromosome: impl Into<String>,
        start: u64,
        end: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            reference: reference.into(),
            alternate: alternate.into(),
            consequence_types: Vec::new(),
            xrefs: Vec::new(),
        }
    }

    pub fn with_consequence_type(mut self, consequence_type: ConsequenceType) -> Self {
        self.consequence_types.push(consequence_type);
        self
    }

    pub fn with_xref(mut self, xref: Xref) -> Self {
        self.xrefs.push(xref);
        self
    }

    ///
    /// Storage key of the variant this record annotates
    ///
    pub fn storage_key(&self, builder: &StorageKeyBuilder) -> StorageKey {
        builder.build(&self.chromosome, self.start, &self.reference, &self.alternate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_uses_start_position() {
        let record = AnnotationRecord::new("20", 60343, 60344, "G", "A");
        let key = record.storage_key(&StorageKeyBuilder::default());
        assert_eq!(key.as_str(), "20_60343_G_A");
    }

    #[test]
    fn test_insertion_key_has_empty_reference() {
        let record = AnnotationRecord::new("1", 1000, 999, "-", "TT");
        let key = record.storage_key(&StorageKeyBuilder::default());
        assert_eq!(key.as_str(), "1_1000__TT");
    }
}
