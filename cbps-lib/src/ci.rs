//! Signals for the pull-request automation that runs after a batch update.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use cbps_github::PullRequest;

use crate::update::UrlChange;

/// Login of the account the automation opens pull requests as.
pub const BOT_LOGIN: &str = "github-actions[bot]";

/// File listing `old_url,new_url` for every updated entry.
pub const UPDATED_URLS_FILE: &str = "updated-urls.csv";

/// Commit/PR message naming every updated title.
pub fn summary_line(changes: &[UrlChange]) -> String {
    let titles: Vec<&str> = changes.iter().map(|c| c.title.as_str()).collect();
    format!("updating: {}", titles.join(", "))
}

/// Whether an automated pull request is already open.
pub fn has_open_bot_pull(pulls: &[PullRequest]) -> bool {
    pulls.iter().any(|p| p.user.login == BOT_LOGIN)
}

/// Where step outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Appended as `name=value` lines to the file named by `$GITHUB_OUTPUT`.
    File(PathBuf),
    /// Printed as `::set-output` workflow commands.
    Stdout,
}

impl OutputSink {
    pub fn from_env() -> Self {
        match std::env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Stdout,
        }
    }

    /// Set a named step output. Newlines in `value` are flattened to spaces.
    pub fn set(&self, name: &str, value: &str, stdout: &mut dyn Write) -> std::io::Result<()> {
        let value = value.replace(['\r', '\n'], " ");
        match self {
            Self::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{name}={value}")
            }
            Self::Stdout => writeln!(stdout, "::set-output name={name}::{value}"),
        }
    }
}

/// Write one `old_url,new_url` line per change.
pub fn write_updated_urls(path: &Path, changes: &[UrlChange]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    let lines: Vec<String> = changes
        .iter()
        .map(|c| format!("{},{}", c.old_url, c.new_url))
        .collect();
    file.write_all(lines.join("\n").as_bytes())?;
    Ok(())
}

/// Emit everything the automation needs after an update run with changes.
///
/// Sets the `updated` output to the summary line, then `has_open_pulls`,
/// then writes the URL list. The pull-request workflow opens a new pull
/// request only when `has_open_pulls` is `true`, so it is `true` exactly when
/// no bot pull request is open yet.
pub fn publish_changes(
    changes: &[UrlChange],
    open_bot_pull: bool,
    sink: &OutputSink,
    urls_path: &Path,
    stdout: &mut dyn Write,
) -> std::io::Result<()> {
    sink.set("updated", &summary_line(changes), stdout)?;
    let may_open_pull = !open_bot_pull;
    sink.set("has_open_pulls", if may_open_pull { "true" } else { "false" }, stdout)?;
    write_updated_urls(urls_path, changes)?;
    log::debug!("Wrote {} URL change(s) to {}", changes.len(), urls_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbps_github::PullUser;
    use tempfile::TempDir;

    fn change(title: &str, old: &str, new: &str) -> UrlChange {
        UrlChange {
            title: title.into(),
            old_url: old.into(),
            new_url: new.into(),
            tag_name: "v1".into(),
        }
    }

    fn pull(login: &str) -> PullRequest {
        PullRequest {
            number: 1,
            user: PullUser { login: login.into() },
        }
    }

    #[test]
    fn test_summary_line() {
        let changes = [change("A", "o", "n"), change("B b", "o", "n")];
        assert_eq!(summary_line(&changes), "updating: A, B b");
    }

    #[test]
    fn test_has_open_bot_pull() {
        assert!(!has_open_bot_pull(&[]));
        assert!(!has_open_bot_pull(&[pull("someone")]));
        assert!(has_open_bot_pull(&[pull("someone"), pull("github-actions[bot]")]));
    }

    #[test]
    fn test_publish_to_stdout() {
        let tmp = TempDir::new().unwrap();
        let urls = tmp.path().join(UPDATED_URLS_FILE);
        let changes = [change("A", "https://x/1.vpk", "https://x/2.vpk"), change("B", "o", "n")];

        let mut out = Vec::new();
        publish_changes(&changes, false, &OutputSink::Stdout, &urls, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "::set-output name=updated::updating: A, B\n::set-output name=has_open_pulls::true\n"
        );
        assert_eq!(
            std::fs::read_to_string(&urls).unwrap(),
            "https://x/1.vpk,https://x/2.vpk\no,n"
        );
    }

    #[test]
    fn test_publish_with_bot_pull_open_blocks_new_pull() {
        let tmp = TempDir::new().unwrap();
        let urls = tmp.path().join(UPDATED_URLS_FILE);
        let changes = [change("A", "o", "n")];

        let mut none_open = Vec::new();
        publish_changes(&changes, false, &OutputSink::Stdout, &urls, &mut none_open).unwrap();
        assert!(String::from_utf8(none_open)
            .unwrap()
            .ends_with("::set-output name=has_open_pulls::true\n"));

        let mut already_open = Vec::new();
        publish_changes(&changes, true, &OutputSink::Stdout, &urls, &mut already_open).unwrap();
        assert!(String::from_utf8(already_open)
            .unwrap()
            .ends_with("::set-output name=has_open_pulls::false\n"));
    }

    #[test]
    fn test_publish_to_output_file_appends() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("github_output");
        std::fs::write(&output, "earlier=1\n").unwrap();
        let sink = OutputSink::File(output.clone());

        let mut out = Vec::new();
        publish_changes(
            &[change("A", "o", "n")],
            true,
            &sink,
            &tmp.path().join(UPDATED_URLS_FILE),
            &mut out,
        )
        .unwrap();

        assert!(out.is_empty());
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "earlier=1\nupdated=updating: A\nhas_open_pulls=false\n"
        );
    }
}
