//! Repository references and URL helpers.

use std::fmt;
use std::str::FromStr;

use crate::error::GitHubError;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];
const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// An `{owner}/{repo}` pair on the repository host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Extract the repository from a GitHub URL.
    ///
    /// Accepts `github.com/{owner}/{repo}` with or without scheme, a trailing
    /// `.git`, and any further path (`/releases`, `/tree/master`, ...).
    pub fn parse(url: &str) -> Result<Self, GitHubError> {
        let invalid = || GitHubError::InvalidRepoUrl(url.to_string());

        let (host, path) = split_host(url).ok_or_else(invalid)?;
        if !GITHUB_HOSTS.contains(&host.to_ascii_lowercase().as_str()) {
            return Err(invalid());
        }

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next().ok_or_else(invalid)?;
        let name = segments.next().ok_or_else(invalid)?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(owner, name))
    }

    /// Canonical web URL of the repository.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    /// Raw file URL for `path` on `branch`.
    pub fn raw_url(&self, branch: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            RAW_HOST,
            self.owner,
            self.name,
            branch,
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = GitHubError;

    /// Parses either a GitHub URL or a bare `owner/repo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(repo) = Self::parse(s) {
            return Ok(repo);
        }
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(GitHubError::InvalidRepoUrl(s.to_string())),
        }
    }
}

/// True when `url` points into a GitHub repository.
pub fn is_github_url(url: &str) -> bool {
    RepoRef::parse(url).is_ok()
}

/// The file name at the end of a download URL.
///
/// This is the name the resolver prefers when a release offers several
/// candidates.
pub fn previous_asset_name(download_url: &str) -> Option<&str> {
    let path = download_url
        .split(['?', '#'])
        .next()
        .unwrap_or(download_url);
    path.rsplit('/').next().filter(|s| !s.is_empty())
}

fn split_host(url: &str) -> Option<(&str, &str)> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    match rest.split_once('/') {
        Some((host, path)) => Some((host, path)),
        None if !rest.is_empty() => Some((rest, "")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let expected = RepoRef::new("TheOfficialFloW", "VitaShell");
        for url in [
            "https://github.com/TheOfficialFloW/VitaShell",
            "https://github.com/TheOfficialFloW/VitaShell/",
            "http://github.com/TheOfficialFloW/VitaShell.git",
            "github.com/TheOfficialFloW/VitaShell/releases/latest",
            "https://www.github.com/TheOfficialFloW/VitaShell/tree/master?tab=readme",
        ] {
            assert_eq!(RepoRef::parse(url).unwrap(), expected, "{url}");
        }
        assert_eq!(expected.to_string(), "TheOfficialFloW/VitaShell");
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        for url in [
            "https://gitlab.com/owner/repo",
            "https://github.com/owner",
            "https://github.com/",
            "https://vitadb.rinnegatamante.it/#/info/1",
            "",
        ] {
            assert!(matches!(
                RepoRef::parse(url),
                Err(GitHubError::InvalidRepoUrl(_))
            ), "{url}");
            assert!(!is_github_url(url));
        }
    }

    #[test]
    fn test_from_str_bare() {
        let repo: RepoRef = "cbps-project/cbps-db".parse().unwrap();
        assert_eq!(repo, RepoRef::new("cbps-project", "cbps-db"));
        assert!("nope".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }

    #[test]
    fn test_raw_url() {
        let repo = RepoRef::new("o", "r");
        assert_eq!(
            repo.raw_url("master", "/sce_sys/icon0.png"),
            "https://raw.githubusercontent.com/o/r/master/sce_sys/icon0.png"
        );
        assert_eq!(repo.html_url(), "https://github.com/o/r");
    }

    #[test]
    fn test_previous_asset_name() {
        assert_eq!(
            previous_asset_name(
                "https://github.com/o/r/releases/download/v1.0/VitaShell.vpk"
            ),
            Some("VitaShell.vpk")
        );
        assert_eq!(previous_asset_name("https://x/a.suprx?raw=1"), Some("a.suprx"));
        assert_eq!(previous_asset_name("https://x/dir/"), None);
    }
}
