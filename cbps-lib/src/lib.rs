//! Catalog workflows built on the package, catalog and GitHub crates.
//!
//! - [`update`]: batch refresh of download links
//! - [`ci`]: outputs for the pull-request automation
//! - [`source`] and [`package`]: gathering details for a new entry

pub mod ci;
pub mod error;
pub mod package;
pub mod source;
pub mod update;

pub use ci::{
    BOT_LOGIN, OutputSink, UPDATED_URLS_FILE, has_open_bot_pull, publish_changes, summary_line,
    write_updated_urls,
};
pub use error::UpdateError;
pub use package::fetch_vpk_metadata;
pub use source::{DEFAULT_README, SourceInfo, png_paths, readme_choices};
pub use update::{
    CheckOutcome, UpdateProgress, UpdateSummary, UrlChange, check_record, managed_repo,
    update_catalog,
};
