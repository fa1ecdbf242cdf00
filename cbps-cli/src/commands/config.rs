use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cbps_github::{ConfigSource, GitHubConfig};

use crate::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(4).collect::<String>())
    }
}

/// Show the effective GitHub settings and where each one comes from.
pub(crate) fn run_config_show(config: &GitHubConfig, token_flag: bool) {
    let path = cbps_github::config_path();
    let sources = cbps_github::config_sources(token_flag);

    log::info!(
        "{}",
        "cbpsdb Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let fields: [(&str, &ConfigSource, Option<String>); 4] = [
        ("token", &sources.token, config.token.as_deref().map(mask_value)),
        ("api_url", &sources.api_url, Some(config.api_url.clone())),
        (
            "timeout_secs",
            &sources.timeout_secs,
            Some(config.timeout_secs.to_string()),
        ),
        ("user_agent", &sources.user_agent, Some(config.user_agent.clone())),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        let name = format!("{}:", name);
        match value {
            Some(v) => log::info!(
                "  {} {} {}",
                name.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {} {} {}",
                name.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match cbps_github::config_path() {
        Some(path) => {
            log::info!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::config("Could not determine config directory")),
    }
}
