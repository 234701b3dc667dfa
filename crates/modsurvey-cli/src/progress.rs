//! Progress bar implementation for survey runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use modsurvey_core::SurveyProgress;
use std::path::Path;

/// CLI progress bar wrapper implementing `SurveyProgress`.
///
/// Displays archive count, throughput and ETA when running in a TTY.
/// Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Creates a hidden-length progress bar; the length is set by
    /// `on_start` once the input directory has been listed.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Surveying [████████░░░░] 42/100 mods (12/s, 5s) foo.jar"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} mods ({per_sec}, {eta}) {prefix}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_message(message.to_string());

        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl SurveyProgress for CliProgress {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_archive_start(&mut self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_prefix(name.to_string_lossy().into_owned());
        }
    }

    fn on_archive_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
