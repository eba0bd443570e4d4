// Desktop/tooling crate — unwrap/expect/panic acceptable in non-library code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
// Binary crate: nothing here is public API.
#![allow(missing_docs)]

mod gen_decomp;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "SoulAudio development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the diacritic-stripping table (unidecomp_map) from UnicodeData.txt
    GenDecomp(gen_decomp::GenDecompArgs),
}

/// Log to stderr; stdout may carry the generated table.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::GenDecomp(args) => gen_decomp::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use unidecomp::TableFormat;

    fn gen_decomp(argv: &[&str]) -> gen_decomp::GenDecompArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::GenDecomp(args) => args,
        }
    }

    #[test]
    fn gen_decomp_defaults() {
        let args = gen_decomp(&["xtask", "gen-decomp"]);
        assert!(!args.wget);
        assert_eq!(args.input, PathBuf::from(gen_decomp::UNIDATA_FILENAME));
        assert_eq!(args.url, gen_decomp::DEFAULT_UNIDATA_URL);
        assert_eq!(args.output, None);
        assert_eq!(args.format, TableFormat::C);
    }

    #[test]
    fn gen_decomp_short_flags() {
        let args = gen_decomp(&["xtask", "gen-decomp", "-w", "-o", "unidecomp.h"]);
        assert!(args.wget);
        assert_eq!(args.output, Some(PathBuf::from("unidecomp.h")));
    }

    #[test]
    fn gen_decomp_rust_format() {
        let args = gen_decomp(&["xtask", "gen-decomp", "--format", "rust", "-i", "ucd/UnicodeData.txt"]);
        assert_eq!(args.format, TableFormat::Rust);
        assert_eq!(args.input, PathBuf::from("ucd/UnicodeData.txt"));
    }

    #[test]
    fn gen_decomp_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["xtask", "gen-decomp", "--format", "json"]).is_err());
    }
}
