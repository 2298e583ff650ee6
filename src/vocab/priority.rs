//! Study priority scoring
//!
//! Combines six independent "needs review now" signals into one urgency
//! value in [0, 1]:
//! - rank: weak net mastery
//! - failure: share of incorrect attempts
//! - level: coarse mastery bucket
//! - recency: time since the row was last practiced
//! - quit: the row was in a session the user abandoned
//! - fairness: how rarely the row has been queued relative to its pool
//!
//! The weights and breakpoints are a product decision. Keep them verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{RowStats, VocabRow};
use super::stats::{failure_rate, level, rank_point};

/// Days assumed for a row that was never practiced
pub const UNSEEN_DAYS: f64 = 999.0;

/// Weights of the score components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityWeights {
    pub rank: f64,
    pub failure: f64,
    pub level: f64,
    pub recency: f64,
    pub quit: f64,
    pub fairness: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            rank: 0.20,
            failure: 0.20,
            level: 0.10,
            recency: 0.20,
            quit: 0.20,
            fairness: 0.10,
        }
    }
}

/// Unweighted component values, exposed for display and debugging
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub rank: f64,
    pub failure: f64,
    pub level: f64,
    pub recency: f64,
    pub quit: f64,
    pub fairness: f64,
}

impl PriorityBreakdown {
    pub fn weighted_total(&self, weights: &PriorityWeights) -> f64 {
        let total = self.rank * weights.rank
            + self.failure * weights.failure
            + self.level * weights.level
            + self.recency * weights.recency
            + self.quit * weights.quit
            + self.fairness * weights.fairness;
        total.clamp(0.0, 1.0)
    }
}

/// Days since the row was last practiced, falling back to when it was last
/// studied
pub fn days_since_practice(stats: &RowStats, now: DateTime<Utc>) -> f64 {
    match stats.last_practice_date.or(stats.last_studied) {
        Some(last) => ((now - last).num_seconds() as f64 / 86_400.0).max(0.0),
        None => UNSEEN_DAYS,
    }
}

pub fn recency_factor(days: f64) -> f64 {
    if days < 2.0 {
        0.1
    } else if days <= 4.0 {
        0.5
    } else if days <= 9.0 {
        0.8
    } else {
        1.0
    }
}

fn rank_factor(rank_point: i64) -> f64 {
    // 1/(rp+1) is undefined at -1 and negative below it; weakest rows
    // saturate at full urgency instead
    if rank_point <= 0 {
        1.0
    } else {
        1.0 / (rank_point as f64 + 1.0)
    }
}

fn fairness_factor(in_queue_count: u32, max_in_queue: u32) -> f64 {
    if max_in_queue == 0 {
        return 1.0;
    }
    (1.0 - in_queue_count as f64 / max_in_queue as f64).clamp(0.0, 1.0)
}

pub fn priority_breakdown(
    stats: &RowStats,
    max_in_queue: u32,
    now: DateTime<Utc>,
) -> PriorityBreakdown {
    PriorityBreakdown {
        rank: rank_factor(rank_point(stats)),
        failure: failure_rate(stats),
        level: 1.0 / (level(stats) as f64 + 1.0),
        recency: recency_factor(days_since_practice(stats, now)),
        quit: if stats.was_quit { 1.0 } else { 0.0 },
        fairness: fairness_factor(stats.in_queue_count, max_in_queue),
    }
}

/// Urgency of a row with the default weights
pub fn priority_score(stats: &RowStats, max_in_queue: u32, now: DateTime<Utc>) -> f64 {
    priority_score_with(stats, max_in_queue, now, &PriorityWeights::default())
}

pub fn priority_score_with(
    stats: &RowStats,
    max_in_queue: u32,
    now: DateTime<Utc>,
    weights: &PriorityWeights,
) -> f64 {
    priority_breakdown(stats, max_in_queue, now).weighted_total(weights)
}

/// Largest `in_queue_count` across a candidate pool
pub fn max_in_queue<'a>(rows: impl IntoIterator<Item = &'a VocabRow>) -> u32 {
    rows.into_iter()
        .map(|r| r.stats.in_queue_count)
        .max()
        .unwrap_or(0)
}

/// A row with its score and the components behind it
#[derive(Debug, Clone, Copy)]
pub struct ScoredRow<'a> {
    pub row: &'a VocabRow,
    pub score: f64,
    pub breakdown: PriorityBreakdown,
}

/// Rows ordered by descending priority; ties keep their input order.
/// The fairness component is relative to the whole pool given.
pub fn rank_by_priority<'a, I>(
    rows: I,
    now: DateTime<Utc>,
    weights: &PriorityWeights,
) -> Vec<ScoredRow<'a>>
where
    I: IntoIterator<Item = &'a VocabRow>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();
    let max = max_in_queue(rows.clone());
    let mut scored: Vec<ScoredRow> = rows
        .map(|row| {
            let breakdown = priority_breakdown(&row.stats, max, now);
            ScoredRow {
                row,
                score: breakdown.weighted_total(weights),
                breakdown,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
