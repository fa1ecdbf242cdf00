//! cbpsdb CLI
//!
//! Command-line tools for maintaining the CBPS homebrew catalog.

mod cli_types;
mod commands;
mod error;
mod prompt;

use std::io::Write;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cbps_github::GitHubConfig;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let token_flag = cli.token.is_some();
    let load_config = || -> Result<GitHubConfig, CliError> {
        Ok(GitHubConfig::load()?.with_token(cli.token.clone()))
    };

    match cli.command {
        Commands::Add { bottom } => {
            commands::add::run_add(&cli.db, &load_config()?, bottom, cli.quiet)
        }
        Commands::Update { dry_run, ref urls_file } => {
            commands::update::run_update(&cli.db, &load_config()?, dry_run, urls_file, cli.quiet)
        }
        Commands::Config { ref action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(&load_config()?, token_flag);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

/// Route `log` output to stdout as plain lines.
///
/// `--quiet` keeps warnings and errors, `--verbose` adds debug messages with
/// timestamps and targets. `RUST_LOG` overrides both.
fn init_logger(quiet: bool, verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis().format_target(true);
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.parse_default_env();
    builder.init();
}
