pub(crate) mod add;
pub(crate) mod config;
pub(crate) mod update;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner in the style used for every network wait.
pub(crate) fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Download bar, switched to a byte counter when the size is unknown.
pub(crate) fn download_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("  [{bar:50.cyan/blue}] {percent:>3}% {bytes}/{total_bytes}")
            .expect("static pattern")
            .progress_chars("=> "),
    );
    pb
}

pub(crate) fn update_download_bar(pb: &ProgressBar, done: u64, total: Option<u64>) {
    match total {
        Some(total) => {
            if pb.length() != Some(total) {
                pb.set_length(total);
            }
            pb.set_position(done);
        }
        None => {
            if pb.position() == 0 {
                pb.set_style(
                    ProgressStyle::with_template("  {spinner:.cyan} {bytes}")
                        .expect("static pattern")
                        .tick_chars("/-\\|"),
                );
            }
            pb.set_position(done);
        }
    }
}
