use std::io::Cursor;

use cbps_github::Downloader;
use cbps_sfo::{VpkMetadata, read_vpk_metadata};

use crate::error::UpdateError;

/// Download a VPK and read its title identifier and title.
pub fn fetch_vpk_metadata(
    downloader: &Downloader,
    url: &str,
    progress: &mut dyn FnMut(u64, Option<u64>),
) -> Result<VpkMetadata, UpdateError> {
    log::info!("downloading: {url}");
    let bytes = downloader.fetch(url, progress)?;
    log::debug!("Downloaded {} bytes", bytes.len());
    Ok(read_vpk_metadata(Cursor::new(bytes))?)
}
