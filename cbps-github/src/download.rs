//! Plain file downloads from arbitrary hosts.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_LENGTH, REFERER};

use crate::client::status_error;
use crate::config::GitHubConfig;
use crate::error::GitHubError;

const CHUNK_SIZE: usize = 1024 * 1024;

/// VitaDB refuses downloads without its own page as referer.
const VITADB_HOST: &str = "vitadb.rinnegatamante.it";
const VITADB_REFERER: &str = "https://vitadb.rinnegatamante.it/";

/// Fetches whole files into memory.
///
/// Only connecting is time-limited; package bodies can take minutes.
pub struct Downloader {
    http: Client,
}

impl Downloader {
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .timeout(None)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http })
    }

    /// Download `url`, calling `progress(downloaded, total)` after each chunk.
    ///
    /// `total` is `None` when the server sends no length.
    pub fn fetch(
        &self,
        url: &str,
        progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<Vec<u8>, GitHubError> {
        let mut request = self.http.get(url);
        if let Some(referer) = referer_for(url) {
            request = request.header(REFERER, referer);
        }

        let mut response = request.send()?;
        if let Some(err) = status_error(response.status(), url) {
            return Err(err);
        }

        let total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        log::debug!("Downloading {url} ({total:?} bytes)");

        read_chunked(&mut response, total, progress)
    }
}

fn read_chunked(
    reader: &mut dyn Read,
    total: Option<u64>,
    progress: &mut dyn FnMut(u64, Option<u64>),
) -> Result<Vec<u8>, GitHubError> {
    let mut data = Vec::with_capacity(total.unwrap_or(0).min(256 * CHUNK_SIZE as u64) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        progress(data.len() as u64, total);
    }
    Ok(data)
}

/// The referer header to send for `url`, if its host needs one.
pub fn referer_for(url: &str) -> Option<&'static str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    host.eq_ignore_ascii_case(VITADB_HOST).then_some(VITADB_REFERER)
}
