//! Global alignment with affine gap costs
//!
//! Gotoh's three-matrix formulation of Needleman-Wunsch. Opening a gap run
//! costs more than extending one, and the two gap directions have independent
//! costs, so a missing truth element and an extra candidate element can be
//! penalized differently.
//!
//! # Algorithm
//!
//! Three (n+1)×(m+1) matrices:
//! - `M[i][j]`: best score ending with truth[i-1] paired with candidate[j-1]
//! - `X[i][j]`: best score ending with truth[i-1] against a gap
//! - `Y[i][j]`: best score ending with candidate[j-1] against a gap
//!
//! ```text
//! M[i][j] = max(M[i-1][j-1], X[i-1][j-1], Y[i-1][j-1]) + score(a, b)
//! X[i][j] = max(M[i-1][j] + open_t + ext_t, X[i-1][j] + ext_t, Y[i-1][j] + open_t + ext_t)
//! Y[i][j] = max(M[i][j-1] + open_c + ext_c, X[i][j-1] + open_c + ext_c, Y[i][j-1] + ext_c)
//! ```
//!
//! Ties prefer M over X over Y. A sentinel that only matches itself is
//! appended to both sequences so traceback always starts from a match at the
//! bottom-right cell; it is not part of the returned alignment.
//!
//! # Example
//!
//! ```
//! use stratum_score::alignment::{AffineGapAligner, ExactMatch};
//! use stratum_score::config::GapPenalties;
//!
//! let truth = vec!['C', 'D', 'E', 'F'];
//! let candidate = vec!['C', 'E', 'F'];
//!
//! let aligner = AffineGapAligner::new(GapPenalties::default());
//! let alignment = aligner.align(&truth, &candidate, &ExactMatch::new(10.0, -5.0))?;
//!
//! assert_eq!(alignment.deletions(), 1);
//! assert_eq!(alignment.aligned_candidate(), vec![Some(0), None, Some(1), Some(2)]);
//! # Ok::<(), stratum_score::ComparisonError>(())
//! ```

use std::ops::{Index, IndexMut};

use super::{Alignment, AlignmentEvent, SimilarityScore};
use crate::config::GapPenalties;
use crate::error::ComparisonError;

/// Score of the sentinel paired with itself
const SENTINEL_SCORE: f64 = 0.0;

/// Matrix a cell's best value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Match,
    GapTruth,
    GapCandidate,
}

/// Dense row-major matrix
struct Grid<T> {
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.cells[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.cells[i * self.cols + j]
    }
}

/// Best of the three predecessors, ties going to M, then X, then Y
fn best(m: f64, x: f64, y: f64) -> (f64, State) {
    let mut out = (m, State::Match);
    if x > out.0 {
        out = (x, State::GapTruth);
    }
    if y > out.0 {
        out = (y, State::GapCandidate);
    }
    out
}

/// Affine-gap global aligner
#[derive(Debug, Clone, Copy)]
pub struct AffineGapAligner {
    gaps: GapPenalties,
}

impl AffineGapAligner {
    /// Create an aligner with the given gap costs
    pub fn new(gaps: GapPenalties) -> Self {
        Self { gaps }
    }

    /// Compute one optimal global alignment of `truth` and `candidate`
    ///
    /// # Arguments
    ///
    /// * `truth` - Reference sequence
    /// * `candidate` - Sequence under evaluation
    /// * `scorer` - Pairwise similarity, higher is more similar
    ///
    /// # Returns
    ///
    /// Alignment whose non-gap truth indices are `0..truth.len()` in order, and
    /// likewise for the candidate.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a gap cost is not finite
    /// - `InvalidSequenceInput` if the scorer rejects an element, or returns a
    ///   non-finite score for a pair
    pub fn align<T, S>(
        &self,
        truth: &[T],
        candidate: &[T],
        scorer: &S,
    ) -> Result<Alignment, ComparisonError>
    where
        S: SimilarityScore<T> + ?Sized,
    {
        let gaps = self.gaps;
        if ![gaps.open_truth, gaps.extend_truth, gaps.open_candidate, gaps.extend_candidate]
            .iter()
            .all(|cost| cost.is_finite())
        {
            return Err(ComparisonError::InvalidInput(format!(
                "Gap costs must be finite: {:?}",
                gaps
            )));
        }

        for item in truth.iter().chain(candidate.iter()) {
            scorer.validate(item)?;
        }

        log::debug!(
            "Aligning {} truth against {} candidate elements",
            truth.len(),
            candidate.len()
        );

        // Sequence lengths including the sentinel
        let n = truth.len() + 1;
        let m = candidate.len() + 1;

        let mut mat_m = Grid::new(n + 1, m + 1, f64::NEG_INFINITY);
        let mut mat_x = Grid::new(n + 1, m + 1, f64::NEG_INFINITY);
        let mut mat_y = Grid::new(n + 1, m + 1, f64::NEG_INFINITY);
        let mut ptr_m = Grid::new(n + 1, m + 1, State::Match);
        let mut ptr_x = Grid::new(n + 1, m + 1, State::GapTruth);
        let mut ptr_y = Grid::new(n + 1, m + 1, State::GapCandidate);

        mat_m[(0, 0)] = 0.0;
        for i in 1..=n {
            mat_x[(i, 0)] = gaps.extend_truth * i as f64;
        }
        for j in 1..=m {
            mat_y[(0, j)] = gaps.extend_candidate * j as f64;
        }

        let open_truth = gaps.open_truth + gaps.extend_truth;
        let open_candidate = gaps.open_candidate + gaps.extend_candidate;

        for i in 1..=n {
            for j in 1..=m {
                let pair = match (truth.get(i - 1), candidate.get(j - 1)) {
                    (Some(t), Some(c)) => {
                        let s = scorer.score(t, c);
                        if !s.is_finite() {
                            return Err(ComparisonError::InvalidSequenceInput(format!(
                                "Non-finite score {} for truth {} / candidate {}",
                                s,
                                i - 1,
                                j - 1
                            )));
                        }
                        s
                    }
                    (None, None) => SENTINEL_SCORE,
                    // The sentinel only pairs with the other sentinel
                    _ => f64::NEG_INFINITY,
                };

                let (diag, from) = best(
                    mat_m[(i - 1, j - 1)],
                    mat_x[(i - 1, j - 1)],
                    mat_y[(i - 1, j - 1)],
                );
                mat_m[(i, j)] = diag + pair;
                ptr_m[(i, j)] = from;

                let (up, from) = best(
                    mat_m[(i - 1, j)] + open_truth,
                    mat_x[(i - 1, j)] + gaps.extend_truth,
                    mat_y[(i - 1, j)] + open_truth,
                );
                mat_x[(i, j)] = up;
                ptr_x[(i, j)] = from;

                let (left, from) = best(
                    mat_m[(i, j - 1)] + open_candidate,
                    mat_x[(i, j - 1)] + open_candidate,
                    mat_y[(i, j - 1)] + gaps.extend_candidate,
                );
                mat_y[(i, j)] = left;
                ptr_y[(i, j)] = from;
            }
        }

        let score = mat_m[(n, m)];

        // Step over the sentinel pair
        let mut state = ptr_m[(n, m)];
        let (mut i, mut j) = (n - 1, m - 1);
        let mut events = Vec::with_capacity(n + m);

        while i > 0 && j > 0 {
            match state {
                State::Match => {
                    events.push(AlignmentEvent {
                        truth: Some(i - 1),
                        candidate: Some(j - 1),
                    });
                    state = ptr_m[(i, j)];
                    i -= 1;
                    j -= 1;
                }
                State::GapTruth => {
                    events.push(AlignmentEvent {
                        truth: Some(i - 1),
                        candidate: None,
                    });
                    state = ptr_x[(i, j)];
                    i -= 1;
                }
                State::GapCandidate => {
                    events.push(AlignmentEvent {
                        truth: None,
                        candidate: Some(j - 1),
                    });
                    state = ptr_y[(i, j)];
                    j -= 1;
                }
            }
        }
        while i > 0 {
            events.push(AlignmentEvent {
                truth: Some(i - 1),
                candidate: None,
            });
            i -= 1;
        }
        while j > 0 {
            events.push(AlignmentEvent {
                truth: None,
                candidate: Some(j - 1),
            });
            j -= 1;
        }
        events.reverse();

        log::debug!(
            "Alignment score {:.2}: {} slots for {}x{} elements",
            score,
            events.len(),
            truth.len(),
            candidate.len()
        );

        Ok(Alignment { events, score })
    }
}
