use anyhow::Result;
use clap::ArgMatches;

use annoload_core::{DigestAlgorithm, StorageKey, StorageKeyBuilder};

pub fn storage_key_from_matches(matches: &ArgMatches) -> Result<StorageKey> {
    let chromosome = matches
        .get_one::<String>("chromosome")
        .expect("A chromosome is required.");
    let position = *matches
        .get_one::<u64>("position")
        .expect("A position is required.");
    let reference = matches
        .get_one::<String>("reference")
        .expect("A reference allele is required.");
    let alternate = matches
        .get_one::<String>("alternate")
        .expect("An alternate allele is required.");
    let digest: DigestAlgorithm = matches
        .get_one::<String>("digest")
        .map(|d| d.parse::<DigestAlgorithm>())
        .transpose()?
        .unwrap_or_default();

    Ok(StorageKeyBuilder::new(digest).build(chromosome, position, reference, alternate))
}

pub fn run_key(matches: &ArgMatches) -> Result<()> {
    let key = storage_key_from_matches(matches)?;
    println!("{}", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::cli::create_key_cli;
    use rstest::rstest;

    #[rstest]
    #[case(&["key", "20", "60343", "G", "A"], "20_60343_G_A")]
    #[case(&["key", "20", "60343", "-", "-"], "20_60343__")]
    #[case(&["key", "X", "5", "-", "TT", "--digest", "sha1"], "X_5__TT")]
    fn test_storage_key_from_matches(#[case] args: &[&str], #[case] expected: &str) {
        let matches = create_key_cli().try_get_matches_from(args).unwrap();
        let key = storage_key_from_matches(&matches).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_unknown_digest_is_an_error() {
        let matches = create_key_cli()
            .try_get_matches_from(["key", "1", "1", "A", "C", "--digest", "crc32"])
            .unwrap();
        assert!(storage_key_from_matches(&matches).is_err());
    }

    #[test]
    fn test_negative_position_is_rejected() {
        let result = create_key_cli().try_get_matches_from(["key", "1", "-5", "A", "C"]);
        assert!(result.is_err());
    }
}
