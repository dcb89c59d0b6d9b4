use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

pub const XREF_SOURCE_DBSNP: &str = "dbSNP";
pub const XREF_SOURCE_HGNC: &str = "HGNC";
pub const XREF_SOURCE_ENSEMBL_GENE: &str = "ensemblGene";
pub const XREF_SOURCE_ENSEMBL_TRANSCRIPT: &str = "ensemblTranscript";
pub const XREF_SOURCE_OTHER: &str = "other";

///
/// Cross reference from a variant to an identifier in another database
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Xref {
    pub id: String,
    pub source: String,
}

impl Xref {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }

    ///
    /// Cross reference for a known variant identifier, e.g. `rs149529999`
    ///
    pub fn existing_variation(id: &str) -> Self {
        let source = if id.starts_with("rs") {
            XREF_SOURCE_DBSNP
        } else {
            XREF_SOURCE_OTHER
        };
        Self::new(id, source)
    }
}

impl Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}
