mod commands;
mod output;
mod settings;

use clap::Parser;
use settings::Settings;
use std::path::PathBuf;
use tabscan_core::parsing::normalize;
use tabscan_core::DEFAULT_DPI;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tabscan",
    version,
    about = "Extract the numbers of a header-labeled table from a scanned PDF",
    after_help = "Environment: TABSCAN_WORK_DIR, TABSCAN_PYTHON, TABSCAN_OCR_SCRIPT, TABSCAN_OCR_LANGS, TABSCAN_OCR_GPU, RUST_LOG"
)]
struct Cli {
    /// Path to the PDF document
    document: PathBuf,

    /// Table header phrase, matched case- and punctuation-insensitively
    #[arg(value_parser = parse_header_phrase)]
    header_phrase: String,

    /// Rendering resolution
    #[arg(long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,
}

/// A header that normalizes to nothing would match every region.
fn parse_header_phrase(s: &str) -> Result<String, String> {
    if normalize(s).is_empty() {
        return Err("header phrase must contain at least one letter or digit".into());
    }
    Ok(s.to_string())
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tabscan_core=warn,tabscan_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    if let Err(e) = commands::locate::run(cli.document, &cli.header_phrase, cli.dpi, &settings) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["tabscan", "report.pdf", "Sales Report"]).unwrap();
        assert_eq!(cli.document, PathBuf::from("report.pdf"));
        assert_eq!(cli.header_phrase, "Sales Report");
        assert_eq!(cli.dpi, 150);
    }

    #[test]
    fn test_cli_dpi() {
        let cli = Cli::try_parse_from(["tabscan", "a.pdf", "Totals", "--dpi", "300"]).unwrap();
        assert_eq!(cli.dpi, 300);
    }

    #[test]
    fn test_cli_rejects_blank_header() {
        assert!(Cli::try_parse_from(["tabscan", "a.pdf", " -- "]).is_err());
        assert!(Cli::try_parse_from(["tabscan", "a.pdf", "Totals", "--dpi", "0"]).is_err());
    }

    #[test]
    fn test_cli_requires_header() {
        assert!(Cli::try_parse_from(["tabscan", "a.pdf"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
