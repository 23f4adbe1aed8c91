//! Sequence alignment modules
//!
//! Reconciles a truth sequence with a possibly misaligned candidate sequence:
//! - Global alignment with affine gap costs (Gotoh)
//! - Similarity scores: projection keys and the weighted element comparator

pub mod affine_gap;
pub mod scoring;

pub use affine_gap::AffineGapAligner;
pub use scoring::{project, ExactMatch, ProjectionKey, WeightedElementScore};

use crate::error::ComparisonError;

/// Similarity between a truth element and a candidate element
///
/// Higher scores mean more similar. Any `Fn(&T, &T) -> f64` closure is a
/// similarity score.
pub trait SimilarityScore<T: ?Sized> {
    /// Score one (truth, candidate) pair
    fn score(&self, truth: &T, candidate: &T) -> f64;

    /// Check that `item` can be scored at all.
    ///
    /// Called on every element of both sequences before alignment starts.
    fn validate(&self, _item: &T) -> Result<(), ComparisonError> {
        Ok(())
    }
}

impl<T: ?Sized, F> SimilarityScore<T> for F
where
    F: Fn(&T, &T) -> f64,
{
    fn score(&self, truth: &T, candidate: &T) -> f64 {
        self(truth, candidate)
    }
}

/// One alignment slot: indices into the truth and candidate sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentEvent {
    /// Truth index, `None` when the slot is an insertion
    pub truth: Option<usize>,
    /// Candidate index, `None` when the slot is a deletion
    pub candidate: Option<usize>,
}

impl AlignmentEvent {
    /// Both sides present (match or substitution)
    pub fn is_match(&self) -> bool {
        self.truth.is_some() && self.candidate.is_some()
    }

    /// Truth element aligned to a gap
    pub fn is_deletion(&self) -> bool {
        self.truth.is_some() && self.candidate.is_none()
    }

    /// Candidate element aligned to a gap
    pub fn is_insertion(&self) -> bool {
        self.truth.is_none() && self.candidate.is_some()
    }
}

/// Result of a global alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Slots in sequence order
    pub events: Vec<AlignmentEvent>,
    /// Optimal alignment score
    pub score: f64,
}

impl Alignment {
    /// Truth side of the alignment, `None` marking gaps
    pub fn aligned_truth(&self) -> Vec<Option<usize>> {
        self.events.iter().map(|e| e.truth).collect()
    }

    /// Candidate side of the alignment, `None` marking gaps
    pub fn aligned_candidate(&self) -> Vec<Option<usize>> {
        self.events.iter().map(|e| e.candidate).collect()
    }

    /// Number of slots pairing two elements
    pub fn matches(&self) -> usize {
        self.events.iter().filter(|e| e.is_match()).count()
    }

    /// Number of truth elements aligned to gaps
    pub fn deletions(&self) -> usize {
        self.events.iter().filter(|e| e.is_deletion()).count()
    }

    /// Number of candidate elements aligned to gaps
    pub fn insertions(&self) -> usize {
        self.events.iter().filter(|e| e.is_insertion()).count()
    }

    /// Rebuild element pairs from the gap-marked alignment
    ///
    /// Walks both sides and consumes the original elements one by one at every
    /// non-gap slot, so `truth` and `candidate` must be the sequences that were
    /// aligned (or sequences of the same length in the same order).
    pub fn pairs<'a, T>(
        &self,
        truth: &'a [T],
        candidate: &'a [T],
    ) -> Vec<(Option<&'a T>, Option<&'a T>)> {
        let mut truth_iter = truth.iter();
        let mut candidate_iter = candidate.iter();
        self.events
            .iter()
            .map(|event| {
                let t = event.truth.and_then(|_| truth_iter.next());
                let c = event.candidate.and_then(|_| candidate_iter.next());
                (t, c)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(truth: Option<usize>, candidate: Option<usize>) -> AlignmentEvent {
        AlignmentEvent { truth, candidate }
    }

    #[test]
    fn test_event_classification() {
        assert!(event(Some(0), Some(0)).is_match());
        assert!(event(Some(0), None).is_deletion());
        assert!(event(None, Some(0)).is_insertion());
        assert!(!event(None, Some(0)).is_match());
    }

    #[test]
    fn test_pairs_consume_in_order() {
        let alignment = Alignment {
            events: vec![
                event(Some(0), Some(0)),
                event(Some(1), None),
                event(None, Some(1)),
                event(Some(2), Some(2)),
            ],
            score: 0.0,
        };
        let truth = ["a", "b", "c"];
        let candidate = ["a", "x", "c"];
        let pairs = alignment.pairs(&truth, &candidate);

        assert_eq!(
            pairs,
            vec![
                (Some(&"a"), Some(&"a")),
                (Some(&"b"), None),
                (None, Some(&"x")),
                (Some(&"c"), Some(&"c")),
            ]
        );
        assert_eq!(alignment.matches(), 2);
        assert_eq!(alignment.deletions(), 1);
        assert_eq!(alignment.insertions(), 1);
        assert_eq!(alignment.aligned_truth(), vec![Some(0), Some(1), None, Some(2)]);
    }
}
