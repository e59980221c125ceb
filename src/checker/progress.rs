// src/checker/progress.rs
// =============================================================================
// Decile progress reporting for a link-checking run.
//
// After every finished check we compute
//
//     percentage = round(100 * completed / total)
//
// and report it only when it is a multiple of 10 that we haven't reported
// yet. With small totals some deciles are never hit (3 links give 33, 67,
// 100), which is expected: the rounding rule is kept as-is.
//
// A ProgressTracker lives for exactly one `check_all` call. Nothing here is
// global, so two runs can never see each other's counters.
// =============================================================================

use serde::Serialize;

/// A single "N% TESTED" milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub percentage: u8,
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}% TESTED", self.percentage)
    }
}

/// Per-run progress state.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    last_reported: u8,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            last_reported: 0,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Records one finished check and returns the milestone to report, if any.
    pub fn record(&mut self) -> Option<ProgressEvent> {
        self.completed += 1;

        let percentage = rounded_percentage(self.completed, self.total);
        if percentage != self.last_reported && percentage % 10 == 0 {
            self.last_reported = percentage;
            Some(ProgressEvent { percentage })
        } else {
            None
        }
    }
}

// round(100 * completed / total), rounding halves up, in integer arithmetic
fn rounded_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    ((200 * completed + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(total: usize) -> Vec<u8> {
        let mut tracker = ProgressTracker::new(total);
        (0..total)
            .filter_map(|_| tracker.record())
            .map(|event| event.percentage)
            .collect()
    }

    #[test]
    fn test_rounding_matches_half_up() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(rounded_percentage(1, 200), 1); // 0.5 rounds up
        assert_eq!(rounded_percentage(5, 5), 100);
    }

    #[test]
    fn test_hundred_links_report_every_decile() {
        assert_eq!(run(100), vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_three_links_only_report_completion() {
        assert_eq!(run(3), vec![100]);
    }

    #[test]
    fn test_single_link_reports_completion() {
        assert_eq!(run(1), vec![100]);
    }

    #[test]
    fn test_no_duplicate_deciles() {
        // 1..=19 of 19 round to 5, 11, 16, 21, 26, 32, 37, 42, 47, 53, 58,
        // 63, 68, 74, 79, 84, 89, 95, 100: only 100 is an exact decile
        let events = run(19);
        assert_eq!(events, vec![100]);

        for total in 1..=250 {
            let events = run(total);
            assert!(events.windows(2).all(|w| w[0] < w[1]), "total {total}");
            assert!(events.iter().all(|p| p % 10 == 0), "total {total}");
            assert_eq!(events.last(), Some(&100), "total {total}");
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(ProgressEvent { percentage: 40 }.to_string(), "40% TESTED");
    }
}
