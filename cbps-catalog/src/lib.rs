//! Homebrew catalog data model and flat-file store.
//!
//! The catalog is a single CSV file with one row per downloadable entry.
//! [`Catalog`] loads the whole file, edits rows in memory, and rewrites the
//! file in one pass. [`EntryDraft`] builds new rows field by field.

pub mod error;
pub mod id;
pub mod record;
pub mod store;
pub mod types;

pub use error::CatalogError;
pub use id::{resolve_id_collision, synthesize_id};
pub use record::{FieldChange, NONE_VALUE, Record};
pub use store::{Catalog, Position};
pub use types::{ConfigType, Entry, EntryDraft, EntryType, field};
