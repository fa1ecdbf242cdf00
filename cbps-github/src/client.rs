use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::config::GitHubConfig;
use crate::error::GitHubError;
use crate::repo::RepoRef;
use crate::resolver::ReleaseSource;
use crate::types::{ContentItem, PullRequest, Release, Repository, Tree};

const API_ACCEPT: &str = "application/vnd.github+json";
const RELEASES_PER_PAGE: u32 = 100;

/// Blocking client for the GitHub REST API.
///
/// Built once from a [`GitHubConfig`] and passed to whatever needs it.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Releases of `repo`, newest first.
    pub fn list_releases(&self, repo: &RepoRef) -> Result<Vec<Release>, GitHubError> {
        self.get_json(&format!(
            "/repos/{}/{}/releases?per_page={}",
            repo.owner, repo.name, RELEASES_PER_PAGE
        ))
    }

    pub fn repository(&self, repo: &RepoRef) -> Result<Repository, GitHubError> {
        self.get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
    }

    /// Every path on `branch`, recursively.
    pub fn tree(&self, repo: &RepoRef, branch: &str) -> Result<Tree, GitHubError> {
        let tree: Tree = self.get_json(&format!(
            "/repos/{}/{}/git/trees/{}?recursive=1",
            repo.owner, repo.name, branch
        ))?;
        if tree.truncated {
            log::warn!("Tree listing for {repo} was truncated");
        }
        Ok(tree)
    }

    /// Files and directories at the repository root.
    pub fn contents(&self, repo: &RepoRef) -> Result<Vec<ContentItem>, GitHubError> {
        self.get_json(&format!("/repos/{}/{}/contents/", repo.owner, repo.name))
    }

    pub fn open_pulls(&self, repo: &RepoRef) -> Result<Vec<PullRequest>, GitHubError> {
        self.get_json(&format!(
            "/repos/{}/{}/pulls?state=open",
            repo.owner, repo.name
        ))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let url = format!("{}{}", self.api_url, path);
        log::debug!("GET {url}");

        let response = self.authorize(self.http.get(&url).header(ACCEPT, API_ACCEPT)).send()?;
        if let Some(err) = status_error(response.status(), &url) {
            return Err(err);
        }

        let text = response.text()?;
        serde_json::from_str(&text).map_err(GitHubError::from)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }
}

impl ReleaseSource for GitHubClient {
    fn list_releases(&self, repo: &RepoRef) -> Result<Vec<Release>, GitHubError> {
        GitHubClient::list_releases(self, repo)
    }
}

/// Map a response status to the error it represents, if any.
///
/// Only `200 OK` carries a body to parse. 404 is recoverable, every other
/// status fails the request.
pub(crate) fn status_error(status: StatusCode, url: &str) -> Option<GitHubError> {
    if status == StatusCode::OK {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(GitHubError::NotFound(url.to_string()))
    } else {
        Some(GitHubError::Transport {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}
