use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cbps_catalog::Catalog;
use cbps_github::{GitHubClient, GitHubConfig, RepoRef};
use cbps_lib::{
    OutputSink, UpdateProgress, UpdateSummary, has_open_bot_pull, publish_changes, summary_line,
    update_catalog,
};

use crate::CliError;

/// Check every managed entry for a newer release and rewrite the catalog.
pub(crate) fn run_update(
    db: &Path,
    config: &GitHubConfig,
    dry_run: bool,
    urls_file: &Path,
    quiet: bool,
) -> Result<(), CliError> {
    let mut catalog = Catalog::load(db)?;
    let client = GitHubClient::new(config)?;

    log::info!(
        "Checking {} entries in {}",
        catalog.len(),
        db.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be modified".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if !client.has_token() {
        log::warn!(
            "{} No GitHub token configured; unauthenticated requests are heavily rate limited",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let pb = super::spinner(quiet, "Checking...");
    let progress = |p: UpdateProgress| match p {
        UpdateProgress::Checking {
            title,
            index,
            total,
        } => pb.set_message(format!("[{}/{}] {}", index + 1, total, title)),
        UpdateProgress::Done => pb.finish_and_clear(),
        UpdateProgress::Updated(_) | UpdateProgress::Skipped { .. } => {}
    };
    let summary = update_catalog(&mut catalog, &client, &progress);
    pb.finish_and_clear();

    print_summary(&summary);

    if dry_run {
        return Ok(());
    }
    catalog.save(db)?;

    if summary.has_changes() {
        let open_bot_pull = check_open_pulls(&client);
        publish_changes(
            &summary.updated,
            open_bot_pull,
            &OutputSink::from_env(),
            urls_file,
            &mut std::io::stdout(),
        )?;
    }
    Ok(())
}

fn print_summary(summary: &UpdateSummary) {
    log::info!("");
    for change in &summary.updated {
        log::info!(
            "  {} {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            change.title,
            change.tag_name.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    for (title, reason) in &summary.skipped {
        log::warn!(
            "  {} {}: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            title,
            reason.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for (title, reason) in &summary.errors {
        log::warn!(
            "  {} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            title,
            reason,
        );
    }

    log::info!(
        "{} checked, {} updated, {} unchanged, {} unmanaged, {} skipped, {} failed",
        summary.checked,
        summary.updated.len(),
        summary.unchanged,
        summary.unmanaged,
        summary.skipped.len(),
        summary.errors.len(),
    );
    if summary.has_changes() {
        log::info!("{}", summary_line(&summary.updated));
    }
}

/// Whether the automation already has a pull request open on this repository.
fn check_open_pulls(client: &GitHubClient) -> bool {
    let Ok(name) = std::env::var("GITHUB_REPOSITORY") else {
        log::debug!("GITHUB_REPOSITORY not set; not checking open pull requests");
        return false;
    };
    let pulls = name
        .parse::<RepoRef>()
        .and_then(|repo| client.open_pulls(&repo));
    match pulls {
        Ok(pulls) => has_open_bot_pull(&pulls),
        Err(e) => {
            log::warn!("Could not list open pull requests on {name}: {e}");
            false
        }
    }
}
