//! Command-line interface parsing and command handlers for md-dl
//!
//! Arguments are parsed with clap. Global options may also be supplied through
//! `MD_*` environment variables and are resolved into `Settings` once per run.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

use crate::cache::CacheStore;
use crate::catalog::{Catalog, DescribeError};
use crate::data::{Fetcher, DEFAULT_BASE_URL};
use crate::render::render;

/// Feed language used when none is configured
pub const DEFAULT_LANGUAGE: &str = "en";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// The language code is empty or contains whitespace
    #[error("Invalid language code: '{0}'")]
    InvalidLanguage(String),
}

/// md-dl - Describe MangaDex series from the command line
#[derive(Parser, Debug)]
#[command(name = "md-dl")]
#[command(about = "Describe MangaDex series, caching API responses locally")]
#[command(version)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    /// Base URL of the MangaDex API
    #[arg(long, global = true, env = "MD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding cached responses [default: platform cache dir]
    #[arg(long, global = true, env = "MD_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Translated language the chapter feed is filtered to. Cached chapters
    /// are not refetched when this changes; pass --force to refresh them
    #[arg(long, global = true, env = "MD_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a summary of a series and its latest chapter
    Describe {
        /// Ignore cached responses and fetch fresh data
        #[arg(long)]
        force: bool,

        /// MangaDex series id
        id: String,
    },

    /// Download the chapters of a series (not implemented yet)
    Download {
        /// Language code to filter chapters
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,

        /// MangaDex series id
        id: String,
    },
}

/// Configuration resolved from CLI arguments and the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub language: String,
}

impl Settings {
    /// Creates Settings from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Settings)` with the cache directory defaulted if unset
    /// * `Err(CliError)` if the base URL or language is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }
        if cli.language.is_empty() || cli.language.contains(char::is_whitespace) {
            return Err(CliError::InvalidLanguage(cli.language.clone()));
        }

        Ok(Settings {
            base_url: cli.base_url.clone(),
            cache_dir: cli.cache_dir.clone().unwrap_or_else(CacheStore::default_dir),
            language: cli.language.clone(),
        })
    }
}

/// Exit status for an argument parsing failure
///
/// Help and version output exit successfully; every other parse error,
/// including a missing subcommand, exits with status 1.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Describes a series and renders the summary text
pub async fn describe<F: Fetcher>(
    catalog: &Catalog<F>,
    id: &str,
    force: bool,
) -> Result<String, DescribeError> {
    let details = catalog.describe(id, force).await?;
    Ok(render(&details))
}

/// Placeholder for chapter downloads; logs and succeeds
pub fn download(id: &str, lang: &str) {
    error!(id, lang, "chapter download is not implemented yet");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("arguments should parse")
    }

    #[test]
    fn test_describe_defaults_to_cached_reads() {
        let cli = parse(&["md-dl", "describe", "abc"]);
        assert_eq!(
            cli.command,
            Command::Describe {
                force: false,
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_describe_force_flag() {
        let cli = parse(&["md-dl", "describe", "--force", "abc"]);
        assert_eq!(
            cli.command,
            Command::Describe {
                force: true,
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_download_lang_flag() {
        let cli = parse(&["md-dl", "download", "--lang=fr", "abc"]);
        assert_eq!(
            cli.command,
            Command::Download {
                lang: "fr".to_string(),
                id: "abc".to_string()
            }
        );

        let cli = parse(&["md-dl", "download", "abc"]);
        assert!(matches!(cli.command, Command::Download { ref lang, .. } if lang == "en"));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&[
            "md-dl",
            "describe",
            "abc",
            "--base-url",
            "http://localhost:9000",
            "--cache-dir",
            "/tmp/md",
            "--language",
            "ja",
        ]);
        assert_eq!(cli.base_url, "http://localhost:9000");
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/md")));
        assert_eq!(cli.language, "ja");
    }

    #[test]
    fn test_no_arguments_is_a_usage_error() {
        let err = Cli::try_parse_from(["md-dl"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_unknown_subcommand_is_a_usage_error() {
        let err = Cli::try_parse_from(["md-dl", "frobnicate"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_missing_id_is_a_usage_error() {
        let err = Cli::try_parse_from(["md-dl", "describe"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_help_exits_successfully() {
        let err = Cli::try_parse_from(["md-dl", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }

    #[test]
    fn test_settings_from_cli_uses_explicit_cache_dir() {
        let cli = parse(&["md-dl", "--cache-dir", "/tmp/md", "describe", "abc"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/md"));
    }

    #[test]
    fn test_settings_hold_only_what_the_client_and_cache_need() {
        let cli = parse(&[
            "md-dl",
            "-v",
            "--base-url",
            "http://localhost:9000",
            "--cache-dir",
            "/tmp/md",
            "--language",
            "ja",
            "describe",
            "abc",
        ]);
        assert!(cli.verbose);

        let settings = Settings::from_cli(&cli).unwrap();

        assert_eq!(
            settings,
            Settings {
                base_url: "http://localhost:9000".to_string(),
                cache_dir: PathBuf::from("/tmp/md"),
                language: "ja".to_string(),
            }
        );
    }

    #[test]
    fn test_settings_from_cli_defaults_cache_dir() {
        let mut cli = parse(&["md-dl", "describe", "abc"]);
        cli.cache_dir = None;
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.cache_dir, CacheStore::default_dir());
    }

    #[test]
    fn test_settings_reject_bad_base_url() {
        let mut cli = parse(&["md-dl", "describe", "abc"]);
        cli.base_url = "ftp://example.org".to_string();
        let err = Settings::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn test_settings_reject_bad_language() {
        let mut cli = parse(&["md-dl", "describe", "abc"]);
        cli.language = "e n".to_string();
        assert!(matches!(
            Settings::from_cli(&cli),
            Err(CliError::InvalidLanguage(_))
        ));
    }
}
