//! xtask gen-decomp — build the diacritic-stripping table from `UnicodeData.txt`.
//!
//! Reads the UCD from `./UnicodeData.txt` (or `--input`), or downloads it once
//! with `--wget`, runs the `unidecomp` pipeline and writes the table to stdout
//! or `--output`. Progress goes to stderr so stdout can be redirected straight
//! into a header file.
//!
//! Nothing is written until the whole table is built; a file target is
//! replaced atomically.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use tempfile::NamedTempFile;
use unidecomp::emit::render_table;
use unidecomp::{TableBuilder, TableFormat};

/// UCD file name, also the default local input.
pub const UNIDATA_FILENAME: &str = "UnicodeData.txt";

/// Canonical download location used by `--wget`.
pub const DEFAULT_UNIDATA_URL: &str = "https://www.unicode.org/Public/UNIDATA/UnicodeData.txt";

/// Named in the generated file's "DO NOT EDIT" header.
pub const GENERATOR_NAME: &str = "xtask gen-decomp";

#[derive(Debug, clap::Args)]
pub struct GenDecompArgs {
    /// Get unicode data from unicode.org instead of a local file
    #[arg(short = 'w', long)]
    pub wget: bool,
    /// Download location used with --wget
    #[arg(long, default_value = DEFAULT_UNIDATA_URL)]
    pub url: String,
    /// Local UnicodeData.txt
    #[arg(short, long, default_value = UNIDATA_FILENAME)]
    pub input: PathBuf,
    /// Output file, default stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Table dialect: `c` (unidecomp_map[]) or `rust` (UNIDECOMP_MAP)
    #[arg(long, default_value_t = TableFormat::C)]
    pub format: TableFormat,
}

/// Where the character database comes from.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Source {
    Local(PathBuf),
    Remote(String),
}

/// Entry point called from main.rs
pub fn run(args: &GenDecompArgs) -> Result<()> {
    let source = resolve_source(args)?;
    let start = Instant::now();

    let text = read_source(&source)?;
    let rendered = generate(&text, args.format)?;

    match &args.output {
        Some(path) => write_atomically(path, &rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write table to stdout")?;
        }
    }

    eprintln!(
        "{}",
        format!(
            "  ✓ Table written to {} in {:.2}s",
            args.output
                .as_deref()
                .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string()),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    Ok(())
}

/// Pick the input, failing before any work when neither a local file nor
/// `--wget` is available.
pub(crate) fn resolve_source(args: &GenDecompArgs) -> Result<Source> {
    if args.wget {
        return Ok(Source::Remote(args.url.clone()));
    }
    if !args.input.is_file() {
        eprintln!("{}", format!("{} not found.", args.input.display()).red().bold());
        eprintln!(
            "{}",
            format!("Download {UNIDATA_FILENAME} from unicode.org or use `--wget'.").dimmed()
        );
        anyhow::bail!("need {} (or --wget)", args.input.display());
    }
    Ok(Source::Local(args.input.clone()))
}

fn read_source(source: &Source) -> Result<String> {
    match source {
        Source::Local(path) => {
            eprintln!("{}", format!("  Reading {}...", path.display()).cyan());
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        Source::Remote(url) => {
            eprintln!("{}", format!("  Fetching {url}...").cyan());
            fetch(url)
        }
    }
}

/// Download `url` once with curl. No retries.
fn fetch(url: &str) -> Result<String> {
    let output = Command::new("curl")
        .args(["--fail", "--silent", "--show-error", "--location", url])
        .output();

    let output = match output {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!("{}", "curl not found in PATH.".red().bold());
            eprintln!(
                "{}",
                format!("Download {UNIDATA_FILENAME} manually and pass --input instead.").dimmed()
            );
            anyhow::bail!("curl not installed");
        }
        Err(e) => return Err(e).context("Failed to run curl"),
    };

    if !output.status.success() {
        eprintln!("{}", "  ✗ Download failed".red().bold());
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Fetching {url} failed");
    }

    tracing::debug!(bytes = output.stdout.len(), "downloaded character database");
    String::from_utf8(output.stdout).context("Downloaded data is not UTF-8")
}

/// Run the pipeline and render the table.
pub(crate) fn generate(text: &str, format: TableFormat) -> Result<String> {
    let built = TableBuilder::new()
        .build_from_str(text)
        .context("Failed to build decomposition table")?;
    tracing::info!(
        parsed = built.stats.parsed,
        retained = built.stats.retained,
        "decomposition table ready"
    );
    Ok(render_table(&built.table, format, GENERATOR_NAME))
}

/// Write `contents` next to `path` and rename it into place.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .context("Failed to write table")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const UNIDATA: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;
00C6;LATIN CAPITAL LETTER AE;Lu;0;L;;;;;N;LATIN CAPITAL LETTER A E;;;00E6;
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
";

    fn args(input: PathBuf, output: Option<PathBuf>, format: TableFormat) -> GenDecompArgs {
        GenDecompArgs {
            wget: false,
            url: DEFAULT_UNIDATA_URL.to_owned(),
            input,
            output,
            format,
        }
    }

    fn write_unidata(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join(UNIDATA_FILENAME);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn missing_input_without_wget_is_usage_error() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("unidecomp.h");
        let a = args(tmp.path().join("nope.txt"), Some(out.clone()), TableFormat::C);
        let err = run(&a).unwrap_err();
        assert!(err.to_string().contains("--wget"));
        assert!(!out.exists());
    }

    #[test]
    fn wget_skips_local_file_check() {
        let tmp = TempDir::new().unwrap();
        let mut a = args(tmp.path().join("nope.txt"), None, TableFormat::C);
        a.wget = true;
        assert_eq!(
            resolve_source(&a).unwrap(),
            Source::Remote(DEFAULT_UNIDATA_URL.to_owned())
        );
    }

    #[test]
    fn local_file_is_used_when_present() {
        let tmp = TempDir::new().unwrap();
        let input = write_unidata(&tmp, UNIDATA);
        let a = args(input.clone(), None, TableFormat::C);
        assert_eq!(resolve_source(&a).unwrap(), Source::Local(input));
    }

    #[test]
    fn writes_c_table_to_output_file() {
        let tmp = TempDir::new().unwrap();
        let input = write_unidata(&tmp, UNIDATA);
        let out = tmp.path().join("unidecomp.h");
        run(&args(input, Some(out.clone()), TableFormat::C)).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("/* This file is automatically generated. DO NOT EDIT!\n"));
        assert!(written.contains("Instead, edit xtask gen-decomp and re-run."));
        assert!(written.contains("\t{   0xc0,   0x41 },\t// À -> A,\t \u{300} (300)\n"));
        assert!(written.contains("\t{   0xc6,   0x41 },\t// Æ -> A,\t\n"));
        assert!(written.ends_with("};\n"));
    }

    #[test]
    fn writes_rust_table_to_output_file() {
        let tmp = TempDir::new().unwrap();
        let input = write_unidata(&tmp, UNIDATA);
        let out = tmp.path().join("unidecomp_map.rs");
        run(&args(input, Some(out.clone()), TableFormat::Rust)).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("pub static UNIDECOMP_MAP: &[(u32, u32)] = &[\n"));
        assert!(written.contains("    (0x00c0, 0x0041), // À -> A,  \u{300} (300)\n"));
    }

    #[test]
    fn overwrites_existing_output() {
        let tmp = TempDir::new().unwrap();
        let input = write_unidata(&tmp, UNIDATA);
        let out = tmp.path().join("unidecomp.h");
        fs::write(&out, "stale").unwrap();
        run(&args(input, Some(out.clone()), TableFormat::C)).unwrap();
        assert!(!fs::read_to_string(&out).unwrap().contains("stale"));
    }

    #[test]
    fn parse_error_leaves_existing_output_untouched() {
        let tmp = TempDir::new().unwrap();
        let input = write_unidata(&tmp, "00C0;BROKEN;Lu;0;L;0041 03ZZ;;;;N;;;;;\n");
        let out = tmp.path().join("unidecomp.h");
        fs::write(&out, "previous table").unwrap();

        let err = run(&args(input, Some(out.clone()), TableFormat::C)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("line 1"), "{chain}");
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous table");
    }

    #[test]
    fn generate_reports_cycles() {
        let text = "0041;A;Lu;0;L;0042 0300;;;;N;;;;;\n0042;B;Lu;0;L;0041 0300;;;;N;;;;;\n";
        let err = generate(text, TableFormat::C).unwrap_err();
        assert!(format!("{err:#}").contains("cycle"));
    }
}
