use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use sprint_capacity::capacity::{FileStore, Planner};
use sprint_capacity::cli;
use sprint_capacity::config::Config;

/// Global args may be given before or after a subcommand; the innermost wins.
fn global_arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Option<T> {
    let mut found = matches.get_one::<T>(name).cloned();
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        if let Some(value) = sub.get_one::<T>(name) {
            found = Some(value.clone());
        }
        current = sub;
    }
    found
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = match cli::command().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(cli::parse_exit_code(&err));
        }
    };
    let config = Config::resolve(
        global_arg::<PathBuf>(&matches, "data-dir"),
        global_arg::<String>(&matches, "log-level"),
    );
    init_tracing(&config);
    tracing::debug!(data_dir = %config.data_dir.display(), "using data directory");

    let mut planner = Planner::new(FileStore::new(&config.data_dir));
    match cli::run(&matches, &mut planner) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
