//! Confidence queue reordering
//!
//! A Confidence review is an endless loop over one queue. Grading a card
//! takes it out of the queue and puts it back further along: the better the
//! grade, the further back it goes, so easy cards come around less often.
//! The queue never grows or shrinks while grading.

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::{ConfidenceProgress, FlashcardStatus};

/// Reinsertion offsets for Again, Hard, Good, Easy, Perfect, Superb
pub const DEFAULT_INTERVALS: [usize; 6] = [3, 5, 8, 13, 21, 34];

#[derive(Error, Debug, PartialEq)]
pub enum ConfidenceError {
    #[error("Row not in review queue: {0}")]
    NotQueued(Uuid),

    #[error("Cannot grade a card as new")]
    NewIsNotAGrade,
}

pub type Result<T> = std::result::Result<T, ConfidenceError>;

/// How many places a card moves back for a grade
pub fn offset(grade: FlashcardStatus) -> Option<usize> {
    let idx = match grade {
        FlashcardStatus::New => return None,
        FlashcardStatus::Again => 0,
        FlashcardStatus::Hard => 1,
        FlashcardStatus::Good => 2,
        FlashcardStatus::Easy => 3,
        FlashcardStatus::Perfect => 4,
        FlashcardStatus::Superb => 5,
    };
    Some(DEFAULT_INTERVALS[idx])
}

/// Move `row_id` from its position `p` to `p + offset` in the queue without
/// it, clamped to the end
pub fn reorder_queue(queue: &[Uuid], row_id: Uuid, offset: usize) -> Option<Vec<Uuid>> {
    let position = queue.iter().position(|id| *id == row_id)?;
    let mut reordered = queue.to_vec();
    let card = reordered.remove(position);
    let target = (position + offset).min(reordered.len());
    reordered.insert(target, card);
    Some(reordered)
}

/// Grade a queued card: reorder the queue and record its status
pub fn apply_grade(
    progress: &mut ConfidenceProgress,
    row_id: Uuid,
    grade: FlashcardStatus,
) -> Result<()> {
    let offset = offset(grade).ok_or(ConfidenceError::NewIsNotAGrade)?;
    let queue = reorder_queue(&progress.queue, row_id, offset)
        .ok_or(ConfidenceError::NotQueued(row_id))?;

    progress.queue = queue;
    progress.card_states.insert(row_id, grade);
    progress.updated_at = Utc::now();

    log::debug!(
        "Graded {} as {} in review {}, moved back {}",
        row_id,
        grade.as_str(),
        progress.id,
        offset
    );

    Ok(())
}

/// Append up to `new_word_count` candidate rows that are not queued yet.
/// Returns the ids that were added.
pub fn add_new_words(progress: &mut ConfidenceProgress, candidates: &[Uuid]) -> Vec<Uuid> {
    let mut queued: HashSet<Uuid> = progress.queue.iter().copied().collect();
    let added: Vec<Uuid> = candidates
        .iter()
        .copied()
        .filter(|id| queued.insert(*id))
        .take(progress.new_word_count)
        .collect();

    if !added.is_empty() {
        progress.queue.extend(added.iter().copied());
        progress.updated_at = Utc::now();
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn progress_with(queue: Vec<Uuid>) -> ConfidenceProgress {
        ConfidenceProgress::new("Review".to_string(), Vec::new(), queue, 2)
    }

    #[test]
    fn test_offsets_increase_with_grade() {
        let offsets: Vec<usize> = FlashcardStatus::GRADES
            .iter()
            .map(|g| offset(*g).unwrap())
            .collect();
        assert_eq!(offsets, DEFAULT_INTERVALS.to_vec());
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(offset(FlashcardStatus::New), None);
    }

    #[test]
    fn test_again_on_short_queue_goes_to_end() {
        let q = ids(4);
        let (a, b, c, d) = (q[0], q[1], q[2], q[3]);
        let mut progress = progress_with(q);

        apply_grade(&mut progress, a, FlashcardStatus::Again).unwrap();

        assert_eq!(progress.queue, vec![b, c, d, a]);
        assert_eq!(progress.status_of(a), FlashcardStatus::Again);
    }

    #[test]
    fn test_again_reinserts_three_back() {
        let q = ids(8);
        let reordered = reorder_queue(&q, q[0], 3).unwrap();
        assert_eq!(reordered, vec![q[1], q[2], q[3], q[0], q[4], q[5], q[6], q[7]]);
    }

    #[test]
    fn test_grade_from_middle_of_queue() {
        let q = ids(6);
        let reordered = reorder_queue(&q, q[2], 3).unwrap();
        assert_eq!(reordered, vec![q[0], q[1], q[3], q[4], q[5], q[2]]);
    }

    #[test]
    fn test_superb_past_the_end_clamps() {
        let q = ids(5);
        let mut progress = progress_with(q.clone());

        apply_grade(&mut progress, q[2], FlashcardStatus::Superb).unwrap();

        assert_eq!(progress.queue, vec![q[0], q[1], q[3], q[4], q[2]]);
        assert_eq!(progress.status_of(q[2]), FlashcardStatus::Superb);
    }

    #[test]
    fn test_queue_length_is_invariant() {
        let q = ids(40);
        let mut progress = progress_with(q.clone());
        for (i, grade) in FlashcardStatus::GRADES.iter().cycle().take(50).enumerate() {
            let front = progress.front().unwrap();
            apply_grade(&mut progress, front, *grade).unwrap();
            assert_eq!(progress.queue.len(), 40, "after grade {}", i);
        }
        let mut sorted = progress.queue.clone();
        sorted.sort();
        let mut expected = q;
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_graded_cards_leave_new_state() {
        let q = ids(5);
        let mut progress = progress_with(q.clone());
        assert!(progress.card_states.is_empty());

        apply_grade(&mut progress, q[0], FlashcardStatus::Good).unwrap();
        apply_grade(&mut progress, q[1], FlashcardStatus::Superb).unwrap();

        assert_eq!(progress.card_states.len(), 2);
        assert!(progress.card_states.values().all(|s| *s != FlashcardStatus::New));
        assert_eq!(progress.status_of(q[2]), FlashcardStatus::New);
        let counts = progress.status_counts();
        assert_eq!(counts.get(&FlashcardStatus::New), Some(&3));
    }

    #[test]
    fn test_errors_leave_progress_untouched() {
        let q = ids(3);
        let mut progress = progress_with(q.clone());

        let stranger = Uuid::new_v4();
        assert_eq!(
            apply_grade(&mut progress, stranger, FlashcardStatus::Good),
            Err(ConfidenceError::NotQueued(stranger))
        );
        assert_eq!(
            apply_grade(&mut progress, q[0], FlashcardStatus::New),
            Err(ConfidenceError::NewIsNotAGrade)
        );
        assert_eq!(progress.queue, q);
        assert!(progress.card_states.is_empty());
    }

    #[test]
    fn test_add_new_words_respects_limit() {
        let q = ids(2);
        let mut progress = progress_with(q.clone());
        let fresh = ids(3);
        let mut candidates = vec![q[0]];
        candidates.extend(fresh.iter().copied());

        let added = add_new_words(&mut progress, &candidates);

        assert_eq!(added, vec![fresh[0], fresh[1]]);
        assert_eq!(progress.queue, vec![q[0], q[1], fresh[0], fresh[1]]);
    }

    #[test]
    fn test_add_new_words_skips_repeated_candidates() {
        let q = ids(1);
        let mut progress = progress_with(q.clone());
        progress.new_word_count = 3;
        let fresh = ids(2);
        let candidates = vec![fresh[0], fresh[0], q[0], fresh[1], fresh[1]];

        let added = add_new_words(&mut progress, &candidates);

        assert_eq!(added, vec![fresh[0], fresh[1]]);
        assert_eq!(progress.queue, vec![q[0], fresh[0], fresh[1]]);
        let counts = progress.status_counts();
        assert_eq!(counts.get(&FlashcardStatus::New), Some(&3));
    }
}
