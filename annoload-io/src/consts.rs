/// Prefix of header and comment lines in annotator output.
pub const COMMENT_PREFIX: char = '#';

/// Value the annotator writes for an empty column.
pub const EMPTY_VALUE: &str = "-";

/// Columns of the default VEP output, in order. `Extra` is optional.
pub const VEP_COLUMNS: [&str; 14] = [
    "Uploaded_variation",
    "Location",
    "Allele",
    "Gene",
    "Feature",
    "Feature_type",
    "Consequence",
    "cDNA_position",
    "CDS_position",
    "Protein_position",
    "Amino_acids",
    "Codons",
    "Existing_variation",
    "Extra",
];

/// Minimum number of columns for a line to be considered an annotation.
pub const VEP_MIN_COLUMNS: usize = VEP_COLUMNS.len() - 1;

/// Buffer size used when opening annotation files.
pub const READ_BUFFER_CAPACITY: usize = 256 * 1024;

// keys of the `Extra` column that map onto dedicated fields
pub const EXTRA_SYMBOL: &str = "SYMBOL";
pub const EXTRA_BIOTYPE: &str = "BIOTYPE";
pub const EXTRA_STRAND: &str = "STRAND";
pub const EXTRA_SIFT: &str = "SIFT";
pub const EXTRA_POLYPHEN: &str = "PolyPhen";
