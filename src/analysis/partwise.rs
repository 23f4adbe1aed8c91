//! Partwise comparison
//!
//! Compares scores part by part instead of concatenating every part per kind.
//! Candidate parts may come out of a transcription in a different order, so
//! each truth part is paired with the candidate part it matches best.
//!
//! # Algorithm
//!
//! 1. Compare every (truth part, candidate part) pair as a single-part score
//! 2. Visit truth parts from last to first; each takes the still-unassigned
//!    candidate part whose comparison logged the fewest diagnostics (the
//!    first one found wins ties)
//! 3. Truth parts left without a candidate are compared against an empty part,
//!    unassigned candidate parts against an empty truth part
//! 4. Merge the tallies of the chosen pairs
//!
//! The assignment is greedy, not an optimal bipartite matching: an early truth
//! part can take a candidate that a later one needed more.

use std::slice;
use std::time::Instant;

use rayon::prelude::*;

use super::accumulator::ScoreAccumulator;
use super::result::ComparisonReport;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::io::ScoreDocument;
use crate::preprocessing::StepResolver;
use crate::{align_categories, build_metadata, prepare_document, PartSequences};

/// One chosen pairing of parts (1-based part numbers)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartAssignment {
    /// Truth part, `None` for a candidate part nothing was assigned to
    pub truth_part: Option<usize>,

    /// Candidate part, `None` for a truth part left without a candidate
    pub candidate_part: Option<usize>,

    /// Diagnostics logged by this pairing
    pub diagnostics: usize,
}

/// Result of a partwise comparison
#[derive(Debug, Clone)]
pub struct PartwiseReport {
    /// Merged report over every assigned pair
    pub report: ComparisonReport,

    /// Pairings in the order they were chosen
    pub assignments: Vec<PartAssignment>,
}

/// Compare two scores part by part with greedy part assignment
///
/// # Arguments
///
/// * `truth` - Reference score
/// * `candidate` - Score under evaluation
/// * `resolver` - Scale step computation for notes
/// * `config` - Comparison configuration parameters
///
/// # Errors
///
/// Same as [`crate::compare_scores`].
pub fn compare_partwise(
    truth: &ScoreDocument,
    candidate: &ScoreDocument,
    resolver: &dyn StepResolver,
    config: &ComparisonConfig,
) -> Result<PartwiseReport, ComparisonError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting partwise comparison: {} truth parts, {} candidate parts",
        truth.part_count(),
        candidate.part_count()
    );

    truth.validate()?;
    candidate.validate()?;

    let mut warnings = Vec::new();
    if truth.part_count() != candidate.part_count() {
        let warning = format!(
            "part count differs: {} truth, {} candidate",
            truth.part_count(),
            candidate.part_count()
        );
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let truth_parts = prepare_document(truth, "truth", resolver, &mut warnings)?;
    let candidate_parts = prepare_document(candidate, "candidate", resolver, &mut warnings)?;

    let mut grid = pair_grid(&truth_parts, &candidate_parts, config)?;

    let mut merged = ScoreAccumulator::new();
    let mut assignments = Vec::new();
    let mut taken = vec![false; candidate_parts.len()];

    for t in (0..truth_parts.len()).rev() {
        let mut best: Option<(usize, usize)> = None;
        for (c, accumulator) in grid[t].iter().enumerate() {
            if taken[c] {
                continue;
            }
            let Some(accumulator) = accumulator else {
                continue;
            };
            let diagnostics = accumulator.diagnostic_count();
            if best.map_or(true, |(_, fewest)| diagnostics < fewest) {
                best = Some((c, diagnostics));
            }
        }

        match best.and_then(|(c, diagnostics)| grid[t][c].take().map(|acc| (c, diagnostics, acc))) {
            Some((c, diagnostics, accumulator)) => {
                log::debug!(
                    "Truth part {} assigned candidate part {} ({} diagnostics)",
                    t + 1,
                    c + 1,
                    diagnostics
                );
                taken[c] = true;
                merged.merge(accumulator);
                assignments.push(PartAssignment {
                    truth_part: Some(t + 1),
                    candidate_part: Some(c + 1),
                    diagnostics,
                });
            }
            None => {
                let accumulator =
                    align_categories(slice::from_ref(&truth_parts[t]), &[], config)?;
                log::debug!("Truth part {} left without a candidate part", t + 1);
                assignments.push(PartAssignment {
                    truth_part: Some(t + 1),
                    candidate_part: None,
                    diagnostics: accumulator.diagnostic_count(),
                });
                merged.merge(accumulator);
            }
        }
    }

    for (c, part) in candidate_parts.iter().enumerate() {
        if taken[c] {
            continue;
        }
        let accumulator = align_categories(&[], slice::from_ref(part), config)?;
        log::debug!("Candidate part {} not assigned to any truth part", c + 1);
        assignments.push(PartAssignment {
            truth_part: None,
            candidate_part: Some(c + 1),
            diagnostics: accumulator.diagnostic_count(),
        });
        merged.merge(accumulator);
    }

    let mut report = merged.finalize(config.pitch_identity_tie_break);
    report.metadata = build_metadata(truth, candidate, config, warnings, start_time);

    log::debug!(
        "Partwise comparison complete: {} assignments, {} wrong",
        assignments.len(),
        report.total_wrong()
    );

    Ok(PartwiseReport {
        report,
        assignments,
    })
}

/// Accumulators of every (truth part, candidate part) pair, indexed [truth][candidate]
fn pair_grid(
    truth: &[PartSequences],
    candidate: &[PartSequences],
    config: &ComparisonConfig,
) -> Result<Vec<Vec<Option<ScoreAccumulator>>>, ComparisonError> {
    let pairs: Vec<(usize, usize)> = (0..truth.len())
        .flat_map(|t| (0..candidate.len()).map(move |c| (t, c)))
        .collect();

    let run = |&(t, c): &(usize, usize)| {
        align_categories(slice::from_ref(&truth[t]), slice::from_ref(&candidate[c]), config)
    };

    let results: Vec<Result<ScoreAccumulator, ComparisonError>> = if config.parallel {
        pairs.par_iter().map(run).collect()
    } else {
        pairs.iter().map(run).collect()
    };

    let mut grid: Vec<Vec<Option<ScoreAccumulator>>> = (0..truth.len())
        .map(|_| (0..candidate.len()).map(|_| None).collect())
        .collect();
    for ((t, c), result) in pairs.into_iter().zip(results) {
        grid[t][c] = Some(result?);
    }
    Ok(grid)
}
