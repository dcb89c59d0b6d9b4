use thiserror::Error;

/// Why a single VEP line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VepParseError {
    #[error("Expected at least {expected} tab-separated columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("Invalid location `{0}`, expected `chromosome:start` or `chromosome:start-end`")]
    InvalidLocation(String),

    #[error("Invalid uploaded variation `{0}`, expected `chromosome_position_reference/alternate`")]
    InvalidUploadedVariation(String),

    #[error("Empty allele column")]
    EmptyAllele,

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
}
