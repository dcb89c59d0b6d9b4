use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::MultiProgress;
use log::{error, info};
use rayon::prelude::*;

use annoload_core::{DigestAlgorithm, StorageKeyBuilder};
use annoload_io::VepAnnotationFile;
use annoload_pipeline::{AppConfig, ChunkedLoader, DocumentStore, RetryingSink, RunReport, StoreSink};

use crate::progress::ProgressSink;

/// Config file values with command line flags layered on top.
pub fn config_from_matches(matches: &ArgMatches) -> Result<AppConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppConfig::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(store) = matches.get_one::<PathBuf>("store") {
        config.store.path = store.clone();
    }
    if let Some(collection) = matches.get_one::<String>("collection") {
        config.store.collection = collection.clone();
    }
    if let Some(chunk_size) = matches.get_one::<usize>("chunk-size") {
        config.pipeline.chunk_size = *chunk_size;
    }
    if let Some(skip_limit) = matches.get_one::<u64>("skip-limit") {
        config.pipeline.skip_limit = *skip_limit;
    }
    if let Some(retries) = matches.get_one::<u32>("retries") {
        config.store.retry_attempts = *retries;
    }
    if let Some(digest) = matches.get_one::<String>("digest") {
        config.digest.algorithm = digest.parse::<DigestAlgorithm>()?;
    }

    config.validate()?;
    Ok(config)
}

fn load_file(
    path: &Path,
    config: &AppConfig,
    store: &DocumentStore,
    multi: &MultiProgress,
) -> Result<RunReport> {
    let source = VepAnnotationFile::new(path)
        .records()
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let keys = StorageKeyBuilder::new(config.digest.algorithm);
    let store_sink = StoreSink::new(store.clone(), config.store.collection.as_str()).with_key_builder(keys);
    let retrying = RetryingSink::new(store_sink)
        .with_max_attempts(config.store.retry_attempts)
        .with_backoff(Duration::from_millis(config.store.retry_backoff_ms));
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut sink = ProgressSink::new(retrying, &label, multi);

    let report = ChunkedLoader::new(config.pipeline, source, &mut sink)?.run();
    sink.finish(if report.is_completed() { "done".to_string() } else { "aborted".to_string() });

    Ok(report)
}

pub fn run_load(matches: &ArgMatches) -> Result<()> {
    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("inputs")
        .expect("At least one input file is required.")
        .cloned()
        .collect();
    let threads = *matches.get_one::<usize>("threads").unwrap_or(&1);

    let config = config_from_matches(matches)?;
    info!(
        "Loading {} file(s) into collection '{}' of {}",
        inputs.len(),
        config.store.collection,
        config.store.path.display()
    );

    let store = DocumentStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store {}", config.store.path.display()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()?;
    let multi = MultiProgress::new();

    let outcomes: Vec<(PathBuf, Result<RunReport>)> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| (path.clone(), load_file(path, &config, &store, &multi)))
            .collect()
    });

    // whatever was written before an abort is kept
    store
        .save(&config.store.path)
        .with_context(|| format!("Failed to save store {}", config.store.path.display()))?;

    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) if report.is_completed() => {
                println!("{}\t{}", path.display(), report);
            }
            Ok(report) => {
                failed += 1;
                println!("{}\t{}", path.display(), report);
            }
            Err(e) => {
                failed += 1;
                error!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} input(s) did not load completely", failed, inputs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::cli::create_load_cli;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    use annoload_core::build_storage_key;

    const VEP: &str = "## ENSEMBL VARIANT EFFECT PREDICTOR v78\n\
#Uploaded_variation\tLocation\tAllele\tGene\tFeature\tFeature_type\tConsequence\tcDNA_position\tCDS_position\tProtein_position\tAmino_acids\tCodons\tExisting_variation\tExtra\n\
20_60343_G/A\t20:60343\tA\t-\t-\t-\tintergenic_variant\t-\t-\t-\t-\t-\t-\n\
20_60419_A/G\t20:60419\tG\t-\t-\t-\tintergenic_variant\t-\t-\t-\t-\t-\t-\n\
broken\n";

    #[fixture]
    fn workdir() -> TempDir {
        tempdir().unwrap()
    }

    fn parse(args: &[&str]) -> ArgMatches {
        create_load_cli().try_get_matches_from(args).unwrap()
    }

    #[rstest]
    fn test_flags_override_config_file(workdir: TempDir) {
        let config_path = workdir.path().join("annoload.toml");
        fs::write(
            &config_path,
            "[pipeline]\nchunk_size = 10\nskip_limit = 3\n[store]\ncollection = \"from_file\"\n",
        )
        .unwrap();

        let matches = parse(&[
            "load",
            "in.txt",
            "--config",
            config_path.to_str().unwrap(),
            "--skip-limit",
            "7",
            "--digest",
            "sha512t24u",
        ]);
        let config = config_from_matches(&matches).unwrap();

        assert_eq!(config.pipeline.chunk_size, 10);
        assert_eq!(config.pipeline.skip_limit, 7);
        assert_eq!(config.store.collection, "from_file");
        assert_eq!(config.digest.algorithm, DigestAlgorithm::Sha512t24u);
    }

    #[rstest]
    #[case(&["load", "in.txt", "--chunk-size", "0"])]
    #[case(&["load", "in.txt", "--retries", "0"])]
    #[case(&["load", "in.txt", "--digest", "md5"])]
    fn test_invalid_overrides_are_rejected(#[case] args: &[&str]) {
        assert!(config_from_matches(&parse(args)).is_err());
    }

    #[rstest]
    fn test_run_load_writes_snapshot(workdir: TempDir) {
        let input = workdir.path().join("vep.txt");
        fs::write(&input, VEP).unwrap();
        let store_path = workdir.path().join("store.json");

        let matches = parse(&[
            "load",
            input.to_str().unwrap(),
            "--store",
            store_path.to_str().unwrap(),
            "--chunk-size",
            "1",
        ]);
        run_load(&matches).unwrap();

        let store = DocumentStore::open(&store_path).unwrap();
        assert_eq!(store.len("variants").unwrap(), 2);
        assert!(store
            .get("variants", &build_storage_key("20", 60419, "A", "G"))
            .unwrap()
            .is_some());
    }

    #[rstest]
    fn test_aborted_input_still_saves_written_batches(workdir: TempDir) {
        let input = workdir.path().join("vep.txt");
        fs::write(&input, VEP).unwrap();
        let store_path = workdir.path().join("store.json");

        let matches = parse(&[
            "load",
            input.to_str().unwrap(),
            "--store",
            store_path.to_str().unwrap(),
            "--chunk-size",
            "1",
            "--skip-limit",
            "0",
        ]);
        assert!(run_load(&matches).is_err());

        let store = DocumentStore::open(&store_path).unwrap();
        assert_eq!(store.len("variants").unwrap(), 2);
    }

    #[rstest]
    fn test_missing_input_fails(workdir: TempDir) {
        let store_path = workdir.path().join("store.json");
        let missing = workdir.path().join("missing.txt");
        let matches = parse(&[
            "load",
            missing.to_str().unwrap(),
            "--store",
            store_path.to_str().unwrap(),
        ]);
        assert!(run_load(&matches).is_err());
    }
}
