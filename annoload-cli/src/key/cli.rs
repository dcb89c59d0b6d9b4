use clap::{Arg, Command, value_parser};

pub const KEY_CMD: &str = "key";

pub fn create_key_cli() -> Command {
    Command::new(KEY_CMD)
        .about("Print the storage key of a single variant.")
        .arg(Arg::new("chromosome").required(true))
        .arg(
            Arg::new("position")
                .required(true)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("reference")
                .required(true)
                .allow_hyphen_values(true)
                .help("Reference allele, `-` if absent"),
        )
        .arg(
            Arg::new("alternate")
                .required(true)
                .allow_hyphen_values(true)
                .help("Alternate allele, `-` if absent"),
        )
        .arg(
            Arg::new("digest")
                .long("digest")
                .default_value("sha1")
                .help("Digest for alleles of 50 or more characters: sha1 or sha512t24u"),
        )
}
