//! PlayStation Vita package metadata.
//!
//! This crate reads the two pieces of binary metadata the catalog tooling
//! needs from a homebrew package:
//!
//! - PSF key/value tables (`param.sfo`)
//! - VPK archives, which carry a `param.sfo` at `sce_sys/param.sfo`

use std::io::{Read, Seek};

pub mod error;
pub mod sfo;
pub mod vpk;

pub use error::SfoError;
pub use sfo::{ParamSfo, SfoValue, ValueFormat, read_sfo};
pub use vpk::{PARAM_SFO_PATH, VpkMetadata, read_vpk_metadata};

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
