use serde::Deserialize;

/// One published release, as returned by `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Assets whose name ends with `suffix` (case-sensitive).
    pub fn assets_ending_with<'a, 's>(
        &'a self,
        suffix: &'s str,
    ) -> impl Iterator<Item = &'a Asset> {
        self.assets.iter().filter(move |a| a.name.ends_with(suffix))
    }

    pub fn asset_names(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.name.as_str()).collect()
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Repository metadata (`GET /repos/{owner}/{repo}`).
#[derive(Debug, Deserialize, Clone)]
pub struct Repository {
    pub default_branch: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Recursive git tree listing.
#[derive(Debug, Deserialize, Clone)]
pub struct Tree {
    #[serde(default)]
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TreeItem {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One item of a contents listing (`GET /repos/{owner}/{repo}/contents/`).
#[derive(Debug, Deserialize, Clone)]
pub struct ContentItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentItem {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// The subset of a pull request the CI signal needs.
#[derive(Debug, Deserialize, Clone)]
pub struct PullRequest {
    #[serde(default)]
    pub number: u64,
    pub user: PullUser,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PullUser {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_releases() {
        let json = r#"[
            {
                "tag_name": "v2.02",
                "name": "VitaShell 2.02",
                "draft": false,
                "prerelease": false,
                "assets": [
                    {
                        "name": "VitaShell.vpk",
                        "browser_download_url": "https://github.com/TheOfficialFloW/VitaShell/releases/download/v2.02/VitaShell.vpk",
                        "size": 1234,
                        "content_type": "application/octet-stream"
                    }
                ],
                "body": "changes"
            },
            { "tag_name": "v2.01", "assets": [] }
        ]"#;
        let releases: Vec<Release> = serde_json::from_str(json).unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v2.02");
        assert_eq!(releases[0].asset_names(), vec!["VitaShell.vpk"]);
        assert_eq!(releases[0].assets[0].size, 1234);
        assert!(releases[1].assets.is_empty());
        assert_eq!(releases[1].name, None);
    }

    #[test]
    fn test_parse_contents_and_tree() {
        let contents: Vec<ContentItem> = serde_json::from_str(
            r#"[
                {"name": "README.md", "type": "file", "download_url": "https://raw.githubusercontent.com/o/r/master/README.md"},
                {"name": "src", "type": "dir", "download_url": null}
            ]"#,
        )
        .unwrap();
        assert!(contents[0].is_file());
        assert!(!contents[1].is_file());
        assert_eq!(contents[1].download_url, None);

        let tree: Tree = serde_json::from_str(
            r#"{"sha": "abc", "tree": [{"path": "sce_sys/icon0.png", "type": "blob"}], "truncated": false}"#,
        )
        .unwrap();
        assert_eq!(tree.tree[0].path, "sce_sys/icon0.png");
    }

    #[test]
    fn test_assets_ending_with() {
        let release = Release {
            tag_name: "v1".into(),
            name: None,
            draft: false,
            prerelease: false,
            assets: ["a.vpk", "a.VPK", "b.suprx", "c.skprx"]
                .iter()
                .map(|n| Asset {
                    name: n.to_string(),
                    browser_download_url: format!("https://x/{n}"),
                    size: 0,
                })
                .collect(),
        };
        let vpks: Vec<&str> = release.assets_ending_with(".vpk").map(|a| a.name.as_str()).collect();
        assert_eq!(vpks, vec!["a.vpk"]);
        assert_eq!(release.assets_ending_with("prx").count(), 2);
        assert_eq!(release.assets_ending_with("").count(), 4);
    }
}
