//! Picking the right download out of a repository's releases.
//!
//! Upstream projects attach files to releases inconsistently: several
//! packages per release, unrelated archives next to the one that matters,
//! or nothing usable at all in the newest release. [`resolve_asset`] walks
//! the releases newest first and stops at the first one that yields an
//! unambiguous candidate.

use crate::error::GitHubError;
use crate::repo::RepoRef;
use crate::types::{Asset, Release};

/// Packaging convention that overrides the normal suffix filter.
pub const VITA_ZIP_SUFFIX: &str = "vita.zip";

/// Anything that can list releases for a repository, newest first.
pub trait ReleaseSource {
    fn list_releases(&self, repo: &RepoRef) -> Result<Vec<Release>, GitHubError>;
}

/// The selected asset and the tag of the release it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub asset: Asset,
    pub tag_name: String,
}

impl ResolvedAsset {
    pub fn download_url(&self) -> &str {
        &self.asset.browser_download_url
    }
}

/// Select the asset within a single release, if it has a clear candidate.
///
/// A `vita.zip` asset wins outright. Otherwise a single asset ending in
/// `suffix` is taken, and among several the one named exactly `previous`.
pub fn select_in_release<'a>(
    release: &'a Release,
    suffix: &str,
    previous: Option<&str>,
) -> Option<&'a Asset> {
    if let Some(asset) = release.assets_ending_with(VITA_ZIP_SUFFIX).next() {
        return Some(asset);
    }

    let matches: Vec<&Asset> = release.assets_ending_with(suffix).collect();
    match matches.as_slice() {
        [] => None,
        [only] => Some(*only),
        many => {
            let previous = previous?;
            let mut exact = many.iter().filter(|a| a.name == previous);
            match (exact.next(), exact.next()) {
                (Some(asset), None) => Some(*asset),
                _ => None,
            }
        }
    }
}

/// Select one asset across `releases` (newest first).
pub fn resolve_asset(
    releases: &[Release],
    suffix: &str,
    previous: Option<&str>,
) -> Result<ResolvedAsset, GitHubError> {
    if releases.is_empty() {
        return Err(GitHubError::NoReleases);
    }

    for release in releases {
        match select_in_release(release, suffix, previous) {
            Some(asset) => {
                log::debug!(
                    "Selected {} from release {}",
                    asset.name,
                    release.tag_name
                );
                return Ok(ResolvedAsset {
                    asset: asset.clone(),
                    tag_name: release.tag_name.clone(),
                });
            }
            None => log::debug!(
                "No clear {:?} asset in release {} ({} assets)",
                suffix,
                release.tag_name,
                release.assets.len()
            ),
        }
    }

    Err(GitHubError::NoAsset)
}

/// List the releases of `repo` and resolve an asset from them.
pub fn resolve_from(
    source: &dyn ReleaseSource,
    repo: &RepoRef,
    suffix: &str,
    previous: Option<&str>,
) -> Result<ResolvedAsset, GitHubError> {
    let releases = source.list_releases(repo)?;
    resolve_asset(&releases, suffix, previous)
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
