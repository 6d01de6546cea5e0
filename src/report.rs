//! Text blocks printed around a CLI run and mirrored in the GUI log

use crate::converter::{FileOutcome, ProgressEvent};
use crate::stats::{format_elapsed, ConversionStats};
use std::fmt::Write;
use std::path::Path;

const RULE_WIDTH: usize = 60;

pub fn render_header() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n   📸  HEIC TO JPG CONVERSION DASHBOARD  📸\n{rule}\n")
}

/// Paths are shown absolute when they can be resolved
pub fn render_run_info(source: &Path, destination: &Path, total_files: usize) -> String {
    format!(
        "Using Source:      {}\nUsing Destination: {}\nTotal Files:       {}\n",
        absolute(source).display(),
        absolute(destination).display(),
        total_files
    )
}

pub fn render_summary(stats: &ConversionStats) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "   ✅  PROCESSING COMPLETE  ✅");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, " ⏱️  Time Elapsed:   {}", format_elapsed(stats.elapsed()));
    let _ = writeln!(out, " 📂 Total Files:    {}", stats.total_files);
    let _ = writeln!(out, "{}", "-".repeat(30));
    let _ = writeln!(out, " 🔄 Converted (HEIC): {}", stats.converted);
    let _ = writeln!(out, " 📋 Copied (Media):   {}", stats.copied);
    let _ = writeln!(out, " ❌ Failed:           {}", stats.failed);
    let _ = writeln!(out, "{rule}");
    out
}

/// One GUI log line per processed file
pub fn render_event_line(event: &ProgressEvent) -> String {
    let mut line = format!(
        "Processed: {} ({}/{})",
        event.file_name, event.stats.processed, event.stats.total_files
    );
    if let FileOutcome::Failed { error } = &event.outcome {
        let _ = write!(line, " - failed: {}", error);
    }
    line
}

fn absolute(path: &Path) -> std::borrow::Cow<'_, Path> {
    match std::path::absolute(path) {
        Ok(p) => p.into(),
        Err(_) => path.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stats(converted: usize, copied: usize, failed: usize) -> ConversionStats {
        let mut stats = ConversionStats::new(converted + copied + failed);
        stats.converted = converted;
        stats.copied = copied;
        stats.failed = failed;
        stats.processed = converted + copied + failed;
        stats
    }

    #[test]
    fn test_summary_lists_every_counter() {
        let summary = render_summary(&stats(3, 2, 1));

        assert!(summary.contains("Total Files:    6"));
        assert!(summary.contains("Converted (HEIC): 3"));
        assert!(summary.contains("Copied (Media):   2"));
        assert!(summary.contains("Failed:           1"));
        assert!(summary.contains("Time Elapsed:"));
    }

    #[test]
    fn test_event_line_mentions_failure() {
        let ok = ProgressEvent {
            file_name: "a.jpg".to_string(),
            outcome: FileOutcome::Copied {
                output: PathBuf::from("out/a.jpg"),
            },
            stats: stats(0, 1, 0),
        };
        assert_eq!(render_event_line(&ok), "Processed: a.jpg (1/1)");

        let bad = ProgressEvent {
            file_name: "b.heic".to_string(),
            outcome: FileOutcome::Failed {
                error: "HEIF decode failed: truncated".to_string(),
            },
            stats: stats(0, 0, 1),
        };
        assert_eq!(
            render_event_line(&bad),
            "Processed: b.heic (1/1) - failed: HEIF decode failed: truncated"
        );
    }

    #[test]
    fn test_run_info_shows_total() {
        let info = render_run_info(Path::new("raw"), Path::new("converted"), 12);

        assert!(info.contains("Total Files:       12"));
        assert!(info.contains("converted"));
    }
}
