//! md-dl - Describe MangaDex series from the command line
//!
//! Fetches a series and its chapter feed, caching both as JSON files, and
//! prints a short summary including the latest chapter.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use md_dl::cache::CacheStore;
use md_dl::catalog::Catalog;
use md_dl::cli::{self, Cli, Command, Settings};
use md_dl::data::MangaDexClient;

/// Installs the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise only warnings and errors are shown,
/// or debug output with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the parsed command
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_cli(&args)?;

    match args.command {
        Command::Describe { force, id } => {
            let client = MangaDexClient::new(&settings.base_url, &settings.language)?;
            let catalog = Catalog::new(client, CacheStore::with_dir(settings.cache_dir));
            let summary = cli::describe(&catalog, &id, force).await?;
            print!("{summary}");
        }
        Command::Download { lang, id } => {
            cli::download(&id, &lang);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = cli::usage_exit_code(&err);
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}
