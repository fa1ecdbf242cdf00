//! Gathering entry details from a GitHub source repository.

use cbps_github::{ContentItem, GitHubClient, GitHubError, Release, RepoRef, Tree};

/// Readme file name offered as the default choice.
pub const DEFAULT_README: &str = "readme.md";

/// Everything the builder offers as choices for a GitHub source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub repo: RepoRef,
    pub default_branch: String,
    pub releases: Vec<Release>,
    /// Root-level files, as `(name, download_url)`.
    pub readme_choices: Vec<(String, String)>,
    /// Every `.png` in the default branch.
    pub icon_paths: Vec<String>,
}

impl SourceInfo {
    pub fn fetch(client: &GitHubClient, repo: &RepoRef) -> Result<Self, GitHubError> {
        let releases = client.list_releases(repo)?;
        let contents = client.contents(repo)?;
        let default_branch = client.repository(repo)?.default_branch;
        let tree = client.tree(repo, &default_branch)?;
        log::debug!(
            "{repo}: {} releases, {} root items, {} tree items on {default_branch}",
            releases.len(),
            contents.len(),
            tree.tree.len()
        );

        Ok(Self {
            readme_choices: readme_choices(&contents),
            icon_paths: png_paths(&tree),
            repo: repo.clone(),
            default_branch,
            releases,
        })
    }

    /// Index into `readme_choices` of the default readme.
    pub fn default_readme(&self) -> Option<usize> {
        self.readme_choices
            .iter()
            .position(|(name, _)| name == DEFAULT_README)
    }

    /// Index into `icon_paths` of the default icon: the last `icon0.png`.
    pub fn default_icon(&self) -> Option<usize> {
        self.icon_paths.iter().rposition(|p| p.ends_with("icon0.png"))
    }

    pub fn icon_url(&self, path: &str) -> String {
        self.repo.raw_url(&self.default_branch, path)
    }

    /// Credits default to the repository owner.
    pub fn default_credits(&self) -> &str {
        &self.repo.owner
    }
}

/// Root-level files that can be linked as a readme.
pub fn readme_choices(contents: &[ContentItem]) -> Vec<(String, String)> {
    contents
        .iter()
        .filter(|item| item.is_file())
        .filter_map(|item| Some((item.name.clone(), item.download_url.clone()?)))
        .collect()
}

pub fn png_paths(tree: &Tree) -> Vec<String> {
    tree.tree
        .iter()
        .filter(|item| item.path.ends_with(".png"))
        .map(|item| item.path.clone())
        .collect()
}
