use cbps_catalog::Catalog;
use cbps_github::{Asset, GitHubError, Release, ReleaseSource, RepoRef};
use cbps_lib::{OutputSink, UPDATED_URLS_FILE, publish_changes, update_catalog};
use std::fs;
use tempfile::TempDir;

struct OneRelease;

impl ReleaseSource for OneRelease {
    fn list_releases(&self, repo: &RepoRef) -> Result<Vec<Release>, GitHubError> {
        Ok(vec![Release {
            tag_name: "v2".into(),
            name: None,
            draft: false,
            prerelease: false,
            assets: vec![Asset {
                name: "App.vpk".into(),
                browser_download_url: format!("https://github.com/{repo}/releases/download/v2/App.vpk"),
                size: 0,
            }],
        }])
    }
}

const HEADER: &str = "id,title,credits,download_url,download_src,download_readme,download_icon0,type,config_type,options,visible,time_added\r\n";

#[test]
fn update_rewrites_file_and_lists_changed_urls() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("cbpsdb.csv");
    let row = "APP000001,App,me,https://github.com/me/app/releases/download/v1/App.vpk,https://github.com/me/app,None,None,VPK,None,None,True,1650000000\r\n";
    fs::write(&db, format!("{HEADER}{row}")).unwrap();

    let mut catalog = Catalog::load(&db).unwrap();
    let summary = update_catalog(&mut catalog, &OneRelease, &|_| {});
    catalog.save(&db).unwrap();

    let expected_row = row.replace("download/v1/", "download/v2/");
    assert_eq!(fs::read_to_string(&db).unwrap(), format!("{HEADER}{expected_row}"));

    let urls = tmp.path().join(UPDATED_URLS_FILE);
    let mut out = Vec::new();
    publish_changes(&summary.updated, false, &OutputSink::Stdout, &urls, &mut out).unwrap();
    assert_eq!(
        fs::read_to_string(&urls).unwrap(),
        "https://github.com/me/app/releases/download/v1/App.vpk,https://github.com/me/app/releases/download/v2/App.vpk"
    );
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("::set-output name=updated::updating: App"));
    assert!(out.contains("::set-output name=has_open_pulls::true"));
}

#[test]
fn header_only_catalog_stays_header_only() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("cbpsdb.csv");
    fs::write(&db, HEADER).unwrap();

    let mut catalog = Catalog::load(&db).unwrap();
    let summary = update_catalog(&mut catalog, &OneRelease, &|_| {});
    catalog.save(&db).unwrap();

    assert!(!summary.has_changes());
    assert_eq!(fs::read_to_string(&db).unwrap(), HEADER);
}
