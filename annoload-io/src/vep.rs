//! Parsing of single VEP output lines.
//!
//! Example input (tab separated):
//!
//! ```text
//! 20_60343_G/A	20:60343	A	-	-	-	intergenic_variant	-	-	-	-	-	-
//! 20_60479_C/T	20:60479	T	-	-	-	intergenic_variant	-	-	-	-	-	rs149529999	GMAF=T:0.0018;AFR_MAF=T:0.01
//! ```
//!
//! Only the shape of a line is checked: column count, the location and the
//! uploaded variation. Everything else is carried over as-is.

use annoload_core::models::xref::{
    XREF_SOURCE_ENSEMBL_GENE, XREF_SOURCE_ENSEMBL_TRANSCRIPT, XREF_SOURCE_HGNC,
};
use annoload_core::{AnnotationRecord, ConsequenceType, Score, Xref};

use crate::consts::*;
use crate::error::VepParseError;

/// `chromosome`, `start`, `end` parsed from the `Location` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    pub chromosome: &'a str,
    pub start: u64,
    pub end: u64,
}

///
/// Parse the `Location` column: `20:60343` or `20:60343-60344`.
///
pub fn parse_location(value: &str) -> Result<Location<'_>, VepParseError> {
    let invalid = || VepParseError::InvalidLocation(value.to_string());

    let (chromosome, range) = value.rsplit_once(':').ok_or_else(invalid)?;
    if chromosome.is_empty() {
        return Err(invalid());
    }

    let (start, end) = match range.split_once('-') {
        Some((start, end)) => (start, end),
        None => (range, range),
    };
    let start = start.parse::<u64>().map_err(|_| invalid())?;
    let end = end.parse::<u64>().map_err(|_| invalid())?;

    Ok(Location {
        chromosome,
        start,
        end,
    })
}

///
/// Extract the reference allele from the `Uploaded_variation` column,
/// e.g. `G` from `20_60343_G/A` and `-` from `1_1000_-/TT`.
///
pub fn parse_reference_allele(value: &str) -> Result<&str, VepParseError> {
    let invalid = || VepParseError::InvalidUploadedVariation(value.to_string());

    let (_, alleles) = value.rsplit_once('_').ok_or_else(invalid)?;
    let (reference, _) = alleles.split_once('/').ok_or_else(invalid)?;
    if reference.is_empty() {
        return Err(invalid());
    }
    Ok(reference)
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == EMPTY_VALUE {
        None
    } else {
        Some(value.to_string())
    }
}

/// Positions may be ranges (`120-121`) or partially unknown (`?-121`); the
/// first known coordinate is kept.
fn optional_position(value: &str) -> Option<u64> {
    value
        .split('-')
        .find_map(|part| part.parse::<u64>().ok())
}

fn parse_extra(value: &str, consequence_type: &mut ConsequenceType) {
    if value.is_empty() || value == EMPTY_VALUE {
        return;
    }

    for field in value.split(';').filter(|f| !f.is_empty()) {
        let (key, val) = field.split_once('=').unwrap_or((field, ""));
        match key {
            EXTRA_SYMBOL => consequence_type.gene_name = optional(val),
            EXTRA_BIOTYPE => consequence_type.biotype = optional(val),
            EXTRA_STRAND => consequence_type.strand = optional(val),
            EXTRA_SIFT => consequence_type.sift = Score::parse(val),
            EXTRA_POLYPHEN => consequence_type.polyphen = Score::parse(val),
            _ => {
                consequence_type
                    .extra
                    .insert(key.to_string(), val.to_string());
            }
        }
    }
}

fn push_unique(xrefs: &mut Vec<Xref>, xref: Xref) {
    if !xrefs.contains(&xref) {
        xrefs.push(xref);
    }
}

///
/// Parse one line of VEP output into an [`AnnotationRecord`].
///
/// The line must not contain its line terminator.
///
pub fn parse_vep_line(line: &str) -> Result<AnnotationRecord, VepParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < VEP_MIN_COLUMNS {
        return Err(VepParseError::TooFewColumns {
            expected: VEP_MIN_COLUMNS,
            found: fields.len(),
        });
    }

    let location = parse_location(fields[1])?;
    let reference = parse_reference_allele(fields[0])?;
    let alternate = fields[2];
    if alternate.is_empty() {
        return Err(VepParseError::EmptyAllele);
    }

    let mut consequence_type = ConsequenceType {
        ensembl_gene_id: optional(fields[3]),
        ensembl_transcript_id: optional(fields[4]),
        feature_type: optional(fields[5]),
        so_terms: fields[6]
            .split(',')
            .filter(|term| !term.is_empty() && *term != EMPTY_VALUE)
            .map(str::to_string)
            .collect(),
        c_dna_position: optional_position(fields[7]),
        cds_position: optional_position(fields[8]),
        aa_position: optional_position(fields[9]),
        aa_change: optional(fields[10]),
        codon: optional(fields[11]),
        ..Default::default()
    };
    if let Some(extra) = fields.get(13) {
        parse_extra(extra, &mut consequence_type);
    }

    let mut xrefs = Vec::new();
    for id in fields[12]
        .split(',')
        .filter(|id| !id.is_empty() && *id != EMPTY_VALUE)
    {
        push_unique(&mut xrefs, Xref::existing_variation(id));
    }
    if let Some(gene_name) = &consequence_type.gene_name {
        push_unique(&mut xrefs, Xref::new(gene_name.as_str(), XREF_SOURCE_HGNC));
    }
    if let Some(gene_id) = &consequence_type.ensembl_gene_id {
        push_unique(&mut xrefs, Xref::new(gene_id.as_str(), XREF_SOURCE_ENSEMBL_GENE));
    }
    if consequence_type.feature_type.as_deref() == Some("Transcript") {
        if let Some(transcript_id) = &consequence_type.ensembl_transcript_id {
            push_unique(
                &mut xrefs,
                Xref::new(transcript_id.as_str(), XREF_SOURCE_ENSEMBL_TRANSCRIPT),
            );
        }
    }

    let mut record = AnnotationRecord::new(
        location.chromosome,
        location.start,
        location.end,
        reference,
        alternate,
    )
    .with_consequence_type(consequence_type);
    record.xrefs = xrefs;

    Ok(record)
}
