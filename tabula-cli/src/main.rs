mod cli;
mod commands;
mod error;
mod input;
mod paths;
mod settings;

use std::fs;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::cli::Args;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let config = match settings::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match commands::run(args.command, &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let result = match paths::cache_dir() {
        Some(dir) => start_logger(&dir, debug),
        None => Err(CliError::NoCacheDir),
    };
    if let Err(e) = result {
        eprintln!("Warning: logging disabled: {}", e);
    }
}

/// Rotates the logs in `dir` and logs to a fresh `latest.log` there.
fn start_logger(dir: &Path, debug: bool) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    paths::rotate_logs(dir);

    let path = paths::latest_log(dir);
    let file = File::create(&path).map_err(|source| CliError::Io { path, source })?;
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
