//! Progress tracking and display using indicatif

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

/// File names longer than this are shortened in the progress message
pub const MAX_NAME_CHARS: usize = 25;

/// Progress tracker for conversion runs
pub struct ProgressTracker {
    enabled: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Create a progress bar for a run over `total` files
    pub fn create_file_progress(&self, total: usize, operation: &str) -> Option<ProgressBar> {
        if !self.enabled || total == 0 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}<{eta_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        pb.set_message(format!("{}...", operation));
        pb.enable_steady_tick(Duration::from_millis(100));

        info!("Started progress tracking for: {}", operation);
        Some(pb)
    }

    /// Advance by one file and show its name
    pub fn file_done(pb: &Option<ProgressBar>, file_name: &str) {
        if let Some(ref progress) = pb {
            progress.set_message(format!("Processing {}", truncate_name(file_name)));
            progress.inc(1);
        }
    }

    /// Finish progress with success message
    pub fn finish_progress(pb: Option<ProgressBar>, success_message: &str) {
        if let Some(progress) = pb {
            progress.finish_with_message(success_message.to_string());
            info!("Progress completed: {}", success_message);
        }
    }
}

/// Shorten `name` to [`MAX_NAME_CHARS`] characters plus `..`
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}..", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_creation_when_disabled() {
        let tracker = ProgressTracker::new(false);
        let pb = tracker.create_file_progress(10, "Converting files");

        assert!(pb.is_none());
    }

    #[test]
    fn test_progress_bar_creation_when_enabled() {
        let tracker = ProgressTracker::new(true);
        let pb = tracker.create_file_progress(10, "Converting files");

        assert!(pb.is_some());
        ProgressTracker::file_done(&pb, "IMG_0001.HEIC");
        assert_eq!(pb.as_ref().map(|p| p.position()), Some(1));
    }

    #[test]
    fn test_zero_total_progress() {
        let tracker = ProgressTracker::new(true);
        let pb = tracker.create_file_progress(0, "empty operation");

        assert!(pb.is_none());
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.jpg"), "short.jpg");
        assert_eq!(
            truncate_name("a_very_long_file_name_from_a_phone.heic"),
            "a_very_long_file_name_fro.."
        );
        // exactly at the limit stays untouched
        let exact = "x".repeat(MAX_NAME_CHARS);
        assert_eq!(truncate_name(&exact), exact);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let name = "фотография_из_отпуска_в_горах.heic";
        let truncated = truncate_name(name);

        assert_eq!(truncated.chars().count(), MAX_NAME_CHARS + 2);
    }
}
