//! SM-2 scheduling for Anki decks
//!
//! Quality ratings (0-5) as produced by [`AnkiGrade::quality`]:
//! - 1: Again, incorrect but recognized once shown
//! - 3: Hard, correct with serious difficulty
//! - 4: Good, correct after hesitation
//! - 5: Easy, perfect response

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::models::AnkiGrade;
use crate::vocab::RowStats;

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f64 = 1.3;

/// Scheduling fields after a review
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    pub due_date: DateTime<Utc>,
}

/// Calculate the next interval, ease factor and due date of a row
pub fn calculate_next_review(
    stats: &RowStats,
    grade: AnkiGrade,
    now: DateTime<Utc>,
) -> ReviewResult {
    let quality = grade.quality();
    let mut ease_factor = stats.anki_ease_factor;
    let interval;
    let repetitions;

    if grade.is_correct() {
        interval = match stats.anki_repetitions {
            0 => 1,
            1 => 6,
            _ => ((stats.anki_interval.max(1) as f64) * ease_factor).round() as u32,
        };
        repetitions = stats.anki_repetitions + 1;

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = (5 - quality) as f64;
        ease_factor += 0.1 - miss * (0.08 + miss * 0.02);
    } else {
        interval = 1;
        repetitions = 0;
        ease_factor -= 0.2;
    }

    let ease_factor = ease_factor.max(MIN_EASE_FACTOR);

    ReviewResult {
        interval,
        ease_factor,
        repetitions,
        due_date: now + Duration::days(interval as i64),
    }
}

/// Apply a review to the row's stats
pub fn apply_review(stats: &mut RowStats, grade: AnkiGrade, now: DateTime<Utc>) -> ReviewResult {
    let result = calculate_next_review(stats, grade, now);

    stats.anki_interval = result.interval;
    stats.anki_ease_factor = result.ease_factor;
    stats.anki_repetitions = result.repetitions;
    stats.anki_due_date = Some(result.due_date);
    if grade.is_correct() {
        stats.correct += 1;
    } else {
        stats.incorrect += 1;
    }
    stats.last_studied = Some(now);
    stats.last_practice_date = Some(now);

    result
}

/// Intervals each button would give, in Again, Hard, Good, Easy order
pub fn preview_intervals(stats: &RowStats, now: DateTime<Utc>) -> [u32; 4] {
    [AnkiGrade::Again, AnkiGrade::Hard, AnkiGrade::Good, AnkiGrade::Easy]
        .map(|grade| calculate_next_review(stats, grade, now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
