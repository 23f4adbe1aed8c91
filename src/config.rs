//! Configuration parameters for score comparison

use serde::{Deserialize, Serialize};

/// Affine gap costs for the aligner
///
/// Costs are added to the alignment score as given, so they are normally
/// negative. "Truth" gaps consume an element of the reference sequence only
/// (a deletion in the candidate); "candidate" gaps consume an element of the
/// candidate sequence only (an insertion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapPenalties {
    /// Cost of opening a gap run that consumes truth elements (default: -10.0)
    pub open_truth: f64,

    /// Cost of each truth element consumed by a gap (default: -1.0)
    pub extend_truth: f64,

    /// Cost of opening a gap run that consumes candidate elements (default: -10.0)
    pub open_candidate: f64,

    /// Cost of each candidate element consumed by a gap (default: -1.0)
    pub extend_candidate: f64,
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self {
            open_truth: -10.0,
            extend_truth: -1.0,
            open_candidate: -10.0,
            extend_candidate: -1.0,
        }
    }
}

/// How element sequences are turned into something the aligner can score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentStrategy {
    /// Align cheap projection keys (letter names, names, measure characters)
    Projection,
    /// Align full elements with the weighted attribute comparator
    Weighted,
}

/// Which note-identity counter survives when both score the same number of errors
///
/// Notes carry two redundant identity attributes: the key-relative scale step
/// and the raw letter name. Only the one with fewer wrong counts is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchIdentity {
    /// Keep the scale step counter on ties
    ScaleStep,
    /// Keep the letter name counter on ties
    Letter,
}

/// Comparison configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    // Alignment
    /// Affine gap costs (default: open -10, extend -1 in both directions)
    pub gaps: GapPenalties,

    /// Alignment strategy (default: Projection)
    pub strategy: AlignmentStrategy,

    /// Score for two equal projection keys (default: 10.0)
    pub match_score: f64,

    /// Score for two different projection keys (default: -5.0)
    pub mismatch_score: f64,

    // Reporting
    /// Tie-break between the scale step and letter name counters (default: ScaleStep)
    pub pitch_identity_tie_break: PitchIdentity,

    // Execution
    /// Align independent categories on the rayon thread pool (default: true)
    pub parallel: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            gaps: GapPenalties::default(),
            strategy: AlignmentStrategy::Projection,
            match_score: 10.0,
            mismatch_score: -5.0,
            pitch_identity_tie_break: PitchIdentity::ScaleStep,
            parallel: true,
        }
    }
}
