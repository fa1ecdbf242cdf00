//! VPK package metadata.
//!
//! A VPK is a plain zip archive. The title identifier and display title live
//! in the PSF table at [`PARAM_SFO_PATH`].

use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;

use crate::error::SfoError;
use crate::sfo::read_sfo;

/// Location of the metadata table inside a VPK.
pub const PARAM_SFO_PATH: &str = "sce_sys/param.sfo";

/// Identifiers recovered from a VPK's `param.sfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpkMetadata {
    /// Nine-character title identifier (e.g. "VITASHELL")
    pub title_id: String,
    /// Display title
    pub title: String,
}

/// Read `TITLE_ID` and `TITLE` from a VPK archive.
pub fn read_vpk_metadata<R: Read + Seek>(reader: R) -> Result<VpkMetadata, SfoError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut file = archive.by_name(PARAM_SFO_PATH)?;

    // Zip entries are not seekable; the table is small enough to buffer.
    let mut buf = Vec::with_capacity(file.size().min(64 * 1024) as usize);
    file.read_to_end(&mut buf)?;
    log::debug!("{} is {} bytes", PARAM_SFO_PATH, buf.len());

    let sfo = read_sfo(&mut Cursor::new(buf))?;
    let title_id = sfo
        .get_str("TITLE_ID")
        .ok_or(SfoError::MissingField("TITLE_ID"))?;
    let title = sfo.get_str("TITLE").ok_or(SfoError::MissingField("TITLE"))?;

    Ok(VpkMetadata {
        title_id: title_id.to_string(),
        title: title.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfo::ParamSfo;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn make_vpk(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn make_param_sfo(title_id: Option<&str>, title: &str) -> Vec<u8> {
        let mut sfo = ParamSfo::new();
        sfo.insert("APP_VER", "01.00");
        sfo.insert("CATEGORY", "gd");
        sfo.insert("TITLE", title);
        if let Some(id) = title_id {
            sfo.insert("TITLE_ID", id);
        }
        sfo.to_bytes().unwrap()
    }

    #[test]
    fn test_reads_title_and_id() {
        let sfo = make_param_sfo(Some("VITASHELL"), "VitaShell");
        let vpk = make_vpk(&[
            ("eboot.bin", b"SCE\0stub"),
            (PARAM_SFO_PATH, &sfo),
            ("sce_sys/icon0.png", b"\x89PNG"),
        ]);

        let meta = read_vpk_metadata(Cursor::new(vpk)).unwrap();
        assert_eq!(meta.title_id, "VITASHELL");
        assert_eq!(meta.title, "VitaShell");
    }

    #[test]
    fn test_missing_param_sfo() {
        let vpk = make_vpk(&[("eboot.bin", b"SCE\0stub")]);
        let err = read_vpk_metadata(Cursor::new(vpk)).unwrap_err();
        assert!(matches!(err, SfoError::Zip(zip::result::ZipError::FileNotFound)));
    }

    #[test]
    fn test_missing_title_id() {
        let sfo = make_param_sfo(None, "No Id");
        let vpk = make_vpk(&[(PARAM_SFO_PATH, &sfo)]);
        let err = read_vpk_metadata(Cursor::new(vpk)).unwrap_err();
        assert!(matches!(err, SfoError::MissingField("TITLE_ID")));
    }

    #[test]
    fn test_not_a_zip() {
        let err = read_vpk_metadata(Cursor::new(b"definitely not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, SfoError::Zip(_)));
    }
}
