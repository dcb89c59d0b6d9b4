mod key;
mod load;
mod progress;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "annoload";
    pub const BIN_NAME: &str = "annoload";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Load variant annotations produced by VEP into a document store, keyed by variant.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence"),
        )
        .subcommand(load::cli::create_load_cli())
        .subcommand(key::cli::create_key_cli())
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(&filters);
    // a logger may already be installed when embedded; keep that one
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // LOAD
        //
        Some((load::cli::LOAD_CMD, matches)) => {
            load::handlers::run_load(matches)?;
        }

        //
        // KEY
        //
        Some((key::cli::KEY_CMD, matches)) => {
            key::handlers::run_key(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[test]
    fn test_verbose_count() {
        let matches = build_parser()
            .try_get_matches_from(["annoload", "-vv", "key", "20", "60343", "G", "A"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
