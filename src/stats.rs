//! Running counters for one conversion run

use std::time::{Duration, Instant};

/// Outcome counters for a single pipeline run.
///
/// The pipeline owns the live record; every progress event carries a copy,
/// so consumers on other threads never observe the record being mutated.
#[derive(Debug, Clone, Copy)]
pub struct ConversionStats {
    pub converted: usize,
    pub copied: usize,
    pub failed: usize,
    pub total_files: usize,
    pub processed: usize,
    pub start_time: Instant,
}

impl ConversionStats {
    pub fn new(total_files: usize) -> Self {
        Self {
            converted: 0,
            copied: 0,
            failed: 0,
            total_files,
            processed: 0,
            start_time: Instant::now(),
        }
    }

    /// Wall-clock time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of files processed so far, in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.processed as f64 / self.total_files as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total_files
    }

    pub(crate) fn record_converted(&mut self) {
        self.converted += 1;
        self.processed += 1;
    }

    pub(crate) fn record_copied(&mut self) {
        self.copied += 1;
        self.processed += 1;
    }

    pub(crate) fn record_failed(&mut self) {
        self.failed += 1;
        self.processed += 1;
    }
}

/// Format a duration the way the summary shows it: `12.34s`, `3m 5s`, `1h 2m 3s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();

    if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0).floor() as u64;
        let secs = seconds % 60.0;
        format!("{}m {:.0}s", minutes, secs)
    } else {
        let hours = (seconds / 3600.0).floor() as u64;
        let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
        let secs = seconds % 60.0;
        format!("{}h {}m {:.0}s", hours, minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_empty() {
        let stats = ConversionStats::new(3);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.fraction(), 0.0);
        assert!(!stats.is_complete());
    }

    #[test]
    fn test_counters_keep_processed_in_sync() {
        let mut stats = ConversionStats::new(3);

        stats.record_converted();
        stats.record_copied();
        stats.record_failed();

        assert_eq!(stats.processed, 3);
        assert_eq!(
            stats.converted + stats.copied + stats.failed,
            stats.processed
        );
        assert!(stats.is_complete());
        assert_eq!(stats.fraction(), 1.0);
    }

    #[test]
    fn test_zero_total_fraction() {
        let stats = ConversionStats::new(0);

        assert_eq!(stats.fraction(), 0.0);
        assert!(stats.is_complete());
    }

    #[test]
    fn test_partial_fraction() {
        let mut stats = ConversionStats::new(3);
        stats.record_copied();

        assert!((stats.fraction() - 0.333).abs() < 0.01);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "59.00s");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_elapsed(Duration::from_secs(3600 + 120 + 3)), "1h 2m 3s");
    }
}
