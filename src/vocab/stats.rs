//! Derived study statistics
//!
//! Pure functions over a row's raw counters. None of them fail: a row that
//! was never attempted has a rate of zero.

use super::models::RowStats;

/// Rank point thresholds; a rank point at or below `LEVEL_THRESHOLDS[i]`
/// maps to level `i + 1`
const LEVEL_THRESHOLDS: [i64; 5] = [0, 3, 7, 15, 31];

pub const MAX_LEVEL: u8 = 6;

/// Net mastery: correct minus incorrect, may be negative
pub fn rank_point(stats: &RowStats) -> i64 {
    stats.correct as i64 - stats.incorrect as i64
}

/// Coarse 1-6 bucket of a rank point
pub fn level_for_rank_point(rank_point: i64) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .position(|&threshold| rank_point <= threshold)
        .map(|idx| idx as u8 + 1)
        .unwrap_or(MAX_LEVEL)
}

pub fn level(stats: &RowStats) -> u8 {
    level_for_rank_point(rank_point(stats))
}

pub fn total_attempts(stats: &RowStats) -> u32 {
    stats.correct + stats.incorrect
}

pub fn success_rate(stats: &RowStats) -> f64 {
    let total = total_attempts(stats);
    if total == 0 {
        return 0.0;
    }
    stats.correct as f64 / total as f64
}

pub fn failure_rate(stats: &RowStats) -> f64 {
    let total = total_attempts(stats);
    if total == 0 {
        return 0.0;
    }
    stats.incorrect as f64 / total as f64
}

/// Clear counters and scheduling state
pub fn reset_progress(stats: &mut RowStats) {
    *stats = RowStats::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(correct: u32, incorrect: u32) -> RowStats {
        RowStats {
            correct,
            incorrect,
            ..RowStats::default()
        }
    }

    #[test]
    fn test_rank_point_can_be_negative() {
        assert_eq!(rank_point(&stats(2, 5)), -3);
        assert_eq!(rank_point(&stats(5, 2)), 3);
    }

    #[test]
    fn test_level_breakpoints() {
        assert_eq!(level_for_rank_point(-10), 1);
        assert_eq!(level_for_rank_point(0), 1);
        assert_eq!(level_for_rank_point(1), 2);
        assert_eq!(level_for_rank_point(3), 2);
        assert_eq!(level_for_rank_point(4), 3);
        assert_eq!(level_for_rank_point(7), 3);
        assert_eq!(level_for_rank_point(8), 4);
        assert_eq!(level_for_rank_point(15), 4);
        assert_eq!(level_for_rank_point(16), 5);
        assert_eq!(level_for_rank_point(31), 5);
        assert_eq!(level_for_rank_point(32), 6);
        assert_eq!(level_for_rank_point(1000), 6);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = level_for_rank_point(-50);
        for rp in -49..100 {
            let current = level_for_rank_point(rp);
            assert!(current >= previous, "level dropped at rank point {}", rp);
            previous = current;
        }
    }

    #[test]
    fn test_rates_without_attempts() {
        let s = stats(0, 0);
        assert_eq!(total_attempts(&s), 0);
        assert_eq!(success_rate(&s), 0.0);
        assert_eq!(failure_rate(&s), 0.0);
    }

    #[test]
    fn test_rates_sum_to_one() {
        for (c, i) in [(1, 0), (0, 1), (3, 7), (13, 4)] {
            let s = stats(c, i);
            assert!((success_rate(&s) + failure_rate(&s) - 1.0).abs() < 1e-12);
        }
        assert_eq!(success_rate(&stats(3, 1)), 0.75);
    }

    #[test]
    fn test_reset_progress() {
        let mut s = RowStats {
            correct: 4,
            incorrect: 2,
            in_queue_count: 3,
            was_quit: true,
            anki_interval: 6,
            anki_ease_factor: 1.9,
            confi_viewed: 8,
            ..RowStats::default()
        };
        reset_progress(&mut s);
        assert_eq!(s, RowStats::default());
    }
}
