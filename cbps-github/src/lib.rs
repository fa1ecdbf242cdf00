//! GitHub access for the catalog tools.
//!
//! [`GitHubClient`] wraps the handful of REST endpoints the tools need,
//! [`resolve_asset`] picks a download out of a release list, and
//! [`Downloader`] fetches files from any host.

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod repo;
pub mod resolver;
pub mod types;

pub use client::GitHubClient;
pub use config::{ConfigSource, ConfigSources, GitHubConfig, config_path, config_sources};
pub use download::{Downloader, referer_for};
pub use error::GitHubError;
pub use repo::{RepoRef, is_github_url, previous_asset_name};
pub use resolver::{
    ReleaseSource, ResolvedAsset, VITA_ZIP_SUFFIX, resolve_asset, resolve_from, select_in_release,
};
pub use types::{Asset, ContentItem, PullRequest, PullUser, Release, Repository, Tree, TreeItem};
