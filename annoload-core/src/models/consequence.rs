use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

///
/// A prediction score with its qualitative label, e.g. SIFT `deleterious(0.01)`
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: f64,
    pub description: String,
}

impl Score {
    ///
    /// Parse a `label(score)` pair as written by the annotator.
    ///
    /// Returns `None` when the value does not have that shape or the score
    /// is not a finite number.
    ///
    pub fn parse(value: &str) -> Option<Self> {
        let (description, rest) = value.split_once('(')?;
        let score = rest
            .strip_suffix(')')?
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())?;
        Some(Score {
            score,
            description: description.to_string(),
        })
    }
}

///
/// Effect of a variant on one feature (transcript, regulatory region...).
///
/// Everything here is carried through to the store as-is; the loader never
/// inspects these fields.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceType {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gene_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ensembl_gene_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ensembl_transcript_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feature_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub biotype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub strand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub c_dna_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cds_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aa_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aa_change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub codon: Option<String>,
    #[serde(default)]
    pub so_terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sift: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub polyphen: Option<Score>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("deleterious(0.01)", Some(Score { score: 0.01, description: "deleterious".to_string() }))]
    #[case("probably_damaging(0.998)", Some(Score { score: 0.998, description: "probably_damaging".to_string() }))]
    #[case("tolerated", None)]
    #[case("benign(x)", None)]
    #[case("deleterious(NaN)", None)]
    #[case("deleterious(inf)", None)]
    #[case("benign(-infinity)", None)]
    fn test_parse_score(#[case] value: &str, #[case] expected: Option<Score>) {
        assert_eq!(Score::parse(value), expected);
    }
}
