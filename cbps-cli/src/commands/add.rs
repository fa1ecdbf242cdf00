use std::io::{BufRead, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cbps_catalog::{Catalog, ConfigType, EntryDraft, EntryType, Position, Record, field};
use cbps_github::{Downloader, GitHubClient, GitHubConfig, RepoRef, is_github_url};
use cbps_lib::{SourceInfo, fetch_vpk_metadata};

use crate::CliError;
use crate::prompt::{Prompter, is_valid_url};

const TAI_OPTIONS_HELP: &str =
    "Title sections to load the plugin under (e.g. '*PCSI00009|*PCSI00007')";
const DATA_OPTIONS_HELP: &str = "Path to extract the data files to";

/// Interactively build one entry and add it to the catalog.
pub(crate) fn run_add(
    db: &Path,
    config: &GitHubConfig,
    bottom: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut catalog = Catalog::load(db)?;
    let mut prompt = Prompter::stdio();

    println!("{}", "New catalog entry".if_supports_color(Stdout, |t| t.bold()));
    println!();

    let draft = collect_draft(&mut prompt, config, catalog.schema(), quiet)?;
    let entry = draft.finalize()?;
    let mut record = entry.to_record();

    let id = catalog.resolve_id_collision(record.id(), record.title());
    if id != record.id() {
        log::info!(
            "  Id {} is taken by another title, using {}",
            record.id().if_supports_color(Stdout, |t| t.yellow()),
            id.if_supports_color(Stdout, |t| t.green()),
        );
        record.set(field::ID, id);
    }

    if let Some(existing) = catalog.find_by_title(record.title()) {
        print_diff(existing, &record, catalog.schema());
        if !prompt.confirm("Found existing entry, do you want to update it?", false)? {
            log::info!("Not updating");
            return Ok(());
        }
        log::info!("Updating in {}", db.display());
        catalog.replace_by_title(record);
    } else {
        log::info!("Adding to {}", db.display());
        let position = if bottom { Position::Bottom } else { Position::Top };
        catalog.insert(record, position);
    }

    catalog.save(db)?;
    log::info!(
        "{} Saved {} entries",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        catalog.len(),
    );
    Ok(())
}

fn collect_draft<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
    config: &GitHubConfig,
    schema: &[String],
    quiet: bool,
) -> Result<EntryDraft, CliError> {
    let mut draft = EntryDraft::new();

    draft.download_src = prompt.text(
        "Source URL (leave empty if none)",
        None,
        false,
        &is_valid_url,
    )?;

    if let Some(src) = draft.download_src.clone().filter(|s| is_github_url(s)) {
        let client = GitHubClient::new(config)?;
        fill_from_github(prompt, &client, &RepoRef::parse(&src)?, &mut draft, quiet)?;
    }

    if draft.download_url.is_none() {
        draft.download_url = prompt.text("VPK/PRX download URL", None, true, &is_valid_url)?;
    }
    let download_url = draft.download_url.clone().unwrap_or_default();

    let guessed = EntryType::from_download_url(&download_url);
    let types: Vec<&str> = EntryType::ALL.iter().map(EntryType::as_str).collect();
    let default = EntryType::ALL.iter().position(|t| *t == guessed);
    let entry_type = EntryType::ALL[prompt.choose("Entry type", &types, default)?];
    draft.entry_type = Some(entry_type);

    match entry_type {
        EntryType::Vpk => {
            let downloader = Downloader::new(config)?;
            let pb = super::download_bar(quiet);
            let metadata = fetch_vpk_metadata(&downloader, &download_url, &mut |done, total| {
                super::update_download_bar(&pb, done, total)
            });
            pb.finish_and_clear();
            let metadata = metadata?;
            log::info!(
                "  {} {} ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                metadata.title,
                metadata.title_id.if_supports_color(Stdout, |t| t.cyan()),
            );
            draft.id = Some(metadata.title_id);
            draft.title = Some(metadata.title);
        }
        EntryType::Plugin => {
            let configs: Vec<&str> = ConfigType::ALL.iter().map(ConfigType::as_str).collect();
            let config_type = ConfigType::ALL[prompt.choose("Config type", &configs, Some(0))?];
            if config_type == ConfigType::Boot {
                return Err(CliError::unsupported(
                    "BOOT plugins have to be added to the catalog by hand",
                ));
            }
            draft.config_type = Some(config_type);
            draft.options = Some(prompt.required(TAI_OPTIONS_HELP, None)?);
        }
        EntryType::Data => {
            draft.options = Some(prompt.required(DATA_OPTIONS_HELP, None)?);
        }
    }

    draft.visible = Some(prompt.confirm("Visible?", true)?);
    draft.stamp_time_added();

    println!();
    println!(
        "{}",
        "Enter missing fields, leave empty if none".if_supports_color(Stdout, |t| t.dimmed()),
    );
    for name in schema {
        fill_missing(prompt, &mut draft, name)?;
    }
    for name in draft.missing_required() {
        fill_missing(prompt, &mut draft, name)?;
    }

    Ok(draft)
}

fn fill_from_github<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
    client: &GitHubClient,
    repo: &RepoRef,
    draft: &mut EntryDraft,
    quiet: bool,
) -> Result<(), CliError> {
    let pb = super::spinner(quiet, &format!("Reading {repo}..."));
    let info = SourceInfo::fetch(client, repo);
    pb.finish_and_clear();
    let info = info?;

    if info.releases.is_empty() {
        log::warn!(
            "  {} Repository has no releases",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        let tags: Vec<&str> = info.releases.iter().map(|r| r.tag_name.as_str()).collect();
        let release = &info.releases[prompt.choose("Release", &tags, Some(0))?];
        if release.assets.is_empty() {
            log::warn!(
                "  {} Release {} has no assets",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                release.tag_name,
            );
        } else {
            let names = release.asset_names();
            let asset = &release.assets[prompt.choose("Asset", &names, Some(0))?];
            draft.download_url = Some(asset.browser_download_url.clone());
        }
    }

    let readme_names: Vec<&str> = info.readme_choices.iter().map(|(n, _)| n.as_str()).collect();
    if let Some(i) = prompt.choose_optional("Readme", &readme_names, info.default_readme())? {
        draft.download_readme = Some(info.readme_choices[i].1.clone());
    }

    if let Some(i) = prompt.choose_optional("Icon (icon0)", &info.icon_paths, info.default_icon())? {
        draft.download_icon0 = Some(info.icon_url(&info.icon_paths[i]));
    }

    draft.credits = Some(prompt.required("Credits", Some(info.default_credits()))?);
    Ok(())
}

/// Prompt for `name` if the draft has no value for it yet.
///
/// The title is asked before the id so the id can default to the title's
/// checksum.
fn fill_missing<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
    draft: &mut EntryDraft,
    name: &str,
) -> Result<(), CliError> {
    if draft.get_field(name).is_some() {
        return Ok(());
    }

    let mut default = None;
    if name == field::ID {
        if draft.title.is_none() {
            draft.title = Some(prompt.required(&label(draft, field::TITLE), None)?);
        }
        default = draft.default_id();
    }

    loop {
        let required = draft.is_required(name);
        let Some(answer) = prompt.text(&label(draft, name), default.as_deref(), required, &|_| true)?
        else {
            return Ok(());
        };
        match draft.set_field(name, &answer) {
            Ok(()) => return Ok(()),
            Err(e) => log::warn!(
                "    {}",
                e.to_string().if_supports_color(Stdout, |t| t.yellow())
            ),
        }
    }
}

fn label(draft: &EntryDraft, name: &str) -> String {
    if draft.is_required(name) {
        format!("(REQUIRED) {name}")
    } else {
        name.to_string()
    }
}

fn print_diff(existing: &Record, new: &Record, schema: &[String]) {
    for change in existing
        .diff(new)
        .into_iter()
        .filter(|c| schema.contains(&c.field))
    {
        log::info!(
            "  {}: [{}  {}]",
            change.field.if_supports_color(Stdout, |t| t.yellow()),
            change
                .old
                .as_deref()
                .unwrap_or("")
                .if_supports_color(Stdout, |t| t.red()),
            change
                .new
                .as_deref()
                .unwrap_or("")
                .if_supports_color(Stdout, |t| t.green()),
        );
    }
}
