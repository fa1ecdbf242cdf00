//! Refreshing download links against upstream releases.
//!
//! Only the `download_url` column is ever touched. Rows that do not change
//! are passed through as the text they were read as, so an unchanged
//! catalog rewrites byte-for-byte.

use cbps_catalog::{Catalog, Record, field};
use cbps_github::{ReleaseSource, RepoRef, is_github_url, previous_asset_name, resolve_from};

use crate::error::UpdateError;

/// A download link that moved to a newer asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlChange {
    pub title: String,
    pub old_url: String,
    pub new_url: String,
    pub tag_name: String,
}

/// Result of checking one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No GitHub source to check against.
    Unmanaged,
    /// The newest matching asset is the one already linked.
    Unchanged,
    Updated(UrlChange),
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum UpdateProgress {
    Checking {
        title: String,
        index: usize,
        total: usize,
    },
    Updated(UrlChange),
    Skipped {
        title: String,
        reason: String,
    },
    Done,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    pub checked: usize,
    pub unchanged: usize,
    pub unmanaged: usize,
    pub updated: Vec<UrlChange>,
    /// Rows left alone after a recoverable failure, as `(title, reason)`.
    pub skipped: Vec<(String, String)>,
    /// Rows left alone after a transport or other unexpected failure.
    pub errors: Vec<(String, String)>,
}

impl UpdateSummary {
    pub fn has_changes(&self) -> bool {
        !self.updated.is_empty()
    }

    pub fn updated_titles(&self) -> Vec<&str> {
        self.updated.iter().map(|c| c.title.as_str()).collect()
    }
}

/// Repository to check a row against, if the row is managed.
///
/// A row is managed when its `download_src` is a GitHub repository URL.
pub fn managed_repo(record: &Record) -> Option<RepoRef> {
    let src = record.download_src()?;
    if !is_github_url(src) {
        return None;
    }
    RepoRef::parse(src).ok()
}

/// Resolve the current asset for one row without modifying it.
pub fn check_record(
    source: &dyn ReleaseSource,
    record: &Record,
) -> Result<CheckOutcome, UpdateError> {
    let Some(repo) = managed_repo(record) else {
        return Ok(CheckOutcome::Unmanaged);
    };

    let entry_type = record
        .entry_type()
        .map_err(|e| UpdateError::invalid_entry(record.id(), e.to_string()))?;

    let old_url = record.download_url().unwrap_or_default();
    let previous = previous_asset_name(old_url);

    let resolved = resolve_from(source, &repo, entry_type.asset_suffix(), previous)?;
    let new_url = resolved.download_url();

    if new_url == old_url {
        return Ok(CheckOutcome::Unchanged);
    }

    Ok(CheckOutcome::Updated(UrlChange {
        title: record.title().to_string(),
        old_url: old_url.to_string(),
        new_url: new_url.to_string(),
        tag_name: resolved.tag_name,
    }))
}

/// Check every row in order and apply new download links in place.
///
/// Failures are recorded per row and never stop the batch.
pub fn update_catalog(
    catalog: &mut Catalog,
    source: &dyn ReleaseSource,
    progress: &dyn Fn(UpdateProgress),
) -> UpdateSummary {
    let mut summary = UpdateSummary::default();
    let total = catalog.len();

    for (index, record) in catalog.records_mut().iter_mut().enumerate() {
        let title = record.title().to_string();
        progress(UpdateProgress::Checking {
            title: title.clone(),
            index,
            total,
        });

        match check_record(source, record) {
            Ok(CheckOutcome::Unmanaged) => summary.unmanaged += 1,
            Ok(CheckOutcome::Unchanged) => {
                summary.checked += 1;
                summary.unchanged += 1;
            }
            Ok(CheckOutcome::Updated(change)) => {
                summary.checked += 1;
                log::info!("updated {} to: {}", change.title, change.tag_name);
                record.set(field::DOWNLOAD_URL, change.new_url.clone());
                progress(UpdateProgress::Updated(change.clone()));
                summary.updated.push(change);
            }
            Err(e) => {
                summary.checked += 1;
                let reason = e.to_string();
                if e.is_recoverable() {
                    log::warn!("{title}: {reason}");
                    summary.skipped.push((title.clone(), reason.clone()));
                } else {
                    log::error!("{title}: {reason}");
                    summary.errors.push((title.clone(), reason.clone()));
                }
                progress(UpdateProgress::Skipped { title, reason });
            }
        }
    }

    progress(UpdateProgress::Done);
    summary
}

#[cfg(test)]
#[path = "tests/update_tests.rs"]
mod tests;
