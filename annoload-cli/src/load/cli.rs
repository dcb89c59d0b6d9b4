use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const LOAD_CMD: &str = "load";

pub fn create_load_cli() -> Command {
    Command::new(LOAD_CMD)
        .about("Load one or more VEP output files (plain or gzipped) into the document store.")
        .arg(
            Arg::new("inputs")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("VEP annotation files"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file; flags below override its values"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .value_parser(value_parser!(PathBuf))
                .help("Path of the store snapshot to update"),
        )
        .arg(
            Arg::new("collection")
                .long("collection")
                .help("Collection that receives the documents"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_parser(value_parser!(usize))
                .help("Records per written batch"),
        )
        .arg(
            Arg::new("skip-limit")
                .long("skip-limit")
                .value_parser(value_parser!(u64))
                .help("Malformed records tolerated per input before aborting"),
        )
        .arg(
            Arg::new("digest")
                .long("digest")
                .help("Digest for alleles of 50 or more characters: sha1 or sha512t24u"),
        )
        .arg(
            Arg::new("retries")
                .long("retries")
                .value_parser(value_parser!(u32))
                .help("Attempts per batch write"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('p')
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Input files loaded in parallel"),
        )
}
