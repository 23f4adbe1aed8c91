//! # Stratum Score
//!
//! Accuracy evaluation for symbolic music transcriptions. Compares a candidate
//! score (OMR or engraving software output) against a trusted reference and
//! reports right/wrong counts for every tracked attribute of every element.
//!
//! ## Features
//!
//! - **Alignment**: Affine-gap global alignment (Gotoh) with asymmetric gap costs
//! - **Normalization**: Persistent markings (clefs, keys, meters) expanded to one per measure
//! - **Accumulation**: Per-attribute tallies with a diagnostic log of every error
//! - **Partwise comparison**: Greedy assignment of candidate parts to truth parts
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use stratum_score::score::{KeySignatureAttributes, NoteAttributes};
//! use stratum_score::{compare_scores, ComparisonConfig, JsonScoreReader, ScoreReader, StepResolver};
//!
//! // Semitones above the tonic, octave removed
//! struct ChromaticSteps;
//!
//! impl StepResolver for ChromaticSteps {
//!     fn scale_step(&self, key: &KeySignatureAttributes, note: &NoteAttributes) -> Option<u8> {
//!         let tonic = key.tonic.pitch_class() as i16 + key.tonic_accidental.semitones() as i16;
//!         let pitch = note.letter.pitch_class() as i16 + note.accidental.semitones() as i16;
//!         Some((pitch - tonic).rem_euclid(12) as u8)
//!     }
//! }
//!
//! let reader = JsonScoreReader::new();
//! let truth = reader.read(Path::new("truth.json"))?;
//! let candidate = reader.read(Path::new("omr.json"))?;
//!
//! let report = compare_scores(&truth, &candidate, &ChromaticSteps, &ComparisonConfig::default())?;
//! for category in &report.categories {
//!     if let Some(total) = category.total() {
//!         println!("{}: {} right, {} wrong", category.kind, total.right, total.wrong);
//!     }
//! }
//! # Ok::<(), stratum_score::ComparisonError>(())
//! ```
//!
//! ## Architecture
//!
//! The comparison pipeline follows this flow:
//!
//! ```text
//! Reader → Normalization → Step Annotation → Alignment → Accumulation → Report
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod preprocessing;
pub mod score;

// Re-export main types
pub use alignment::{AffineGapAligner, Alignment, AlignmentEvent, SimilarityScore};
pub use analysis::{
    compare_partwise, ComparisonMetadata, ComparisonReport, KindReport, PartAssignment,
    PartwiseReport, ResultCounter, ScoreAccumulator,
};
pub use config::{AlignmentStrategy, ComparisonConfig, GapPenalties, PitchIdentity};
pub use error::ComparisonError;
pub use io::{JsonScoreReader, ScoreDocument, ScorePart, ScoreReader};
pub use preprocessing::StepResolver;
pub use score::{ElementKind, ScoreElement};

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;

use alignment::{project, ExactMatch, WeightedElementScore};
use preprocessing::{annotate_steps, normalize_persistent};

/// Per-kind sequences of one part, ready for alignment
pub(crate) type PartSequences = BTreeMap<ElementKind, Vec<ScoreElement>>;

/// Main comparison function
///
/// Compares every element kind of two scores. Parts are concatenated per kind,
/// so a candidate that swaps two parts is penalized as if the music itself
/// were wrong; see [`compare_partwise`] for part-by-part assignment.
///
/// # Arguments
///
/// * `truth` - Reference score
/// * `candidate` - Score under evaluation
/// * `resolver` - Scale step computation for notes
/// * `config` - Comparison configuration parameters
///
/// # Returns
///
/// `ComparisonReport` with per-kind counters, the diagnostic log and metadata
///
/// # Errors
///
/// - `InvalidInput` if a document breaks a structural invariant or the gap
///   costs are not finite
/// - `InvalidSequenceInput` if a sequence cannot be scored
pub fn compare_scores(
    truth: &ScoreDocument,
    candidate: &ScoreDocument,
    resolver: &dyn StepResolver,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, ComparisonError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting score comparison: {} truth parts, {} candidate parts, {:?} strategy",
        truth.part_count(),
        candidate.part_count(),
        config.strategy
    );

    truth.validate()?;
    candidate.validate()?;

    let mut warnings = Vec::new();
    let truth_parts = prepare_document(truth, "truth", resolver, &mut warnings)?;
    let candidate_parts = prepare_document(candidate, "candidate", resolver, &mut warnings)?;

    let accumulator = align_categories(&truth_parts, &candidate_parts, config)?;
    let mut report = accumulator.finalize(config.pitch_identity_tie_break);
    report.metadata = build_metadata(truth, candidate, config, warnings, start_time);

    log::debug!(
        "Comparison complete: {} wrong, {} diagnostics in {:.2} ms",
        report.total_wrong(),
        report.diagnostic_count(),
        report.metadata.processing_time_ms
    );

    Ok(report)
}

/// Normalize persistent markings and annotate note steps, part by part
///
/// Parts without any marking of a persistent kind keep an empty sequence and
/// a warning is recorded.
pub(crate) fn prepare_document(
    document: &ScoreDocument,
    label: &str,
    resolver: &dyn StepResolver,
    warnings: &mut Vec<String>,
) -> Result<Vec<PartSequences>, ComparisonError> {
    let max_measure = document.max_measure();
    log::debug!(
        "Preparing {} score: {} parts, {} measures",
        label,
        document.part_count(),
        max_measure
    );

    let mut prepared = Vec::with_capacity(document.part_count());
    for (index, part) in document.parts.iter().enumerate() {
        let mut sequences = PartSequences::new();
        for kind in ElementKind::ALL {
            let elements = part.elements(kind);
            let sequence = if !kind.is_persistent() {
                elements.to_vec()
            } else if elements.is_empty() {
                if max_measure > 0 {
                    let warning = format!("{} part {} has no {}", label, index + 1, kind);
                    log::warn!("{}; normalization skipped", warning);
                    warnings.push(warning);
                }
                Vec::new()
            } else {
                normalize_persistent(elements, max_measure)?
            };
            sequences.insert(kind, sequence);
        }

        let keys = sequences
            .get(&ElementKind::KeySignature)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let notes = annotate_steps(part.elements(ElementKind::Note), keys, resolver);
        sequences.insert(ElementKind::Note, notes);

        prepared.push(sequences);
    }

    Ok(prepared)
}

/// Align every kind and merge the tallies in fixed kind order
pub(crate) fn align_categories(
    truth: &[PartSequences],
    candidate: &[PartSequences],
    config: &ComparisonConfig,
) -> Result<ScoreAccumulator, ComparisonError> {
    let run = |kind: ElementKind| {
        let truth_sequence = concat(truth, kind);
        let candidate_sequence = concat(candidate, kind);
        align_category(kind, &truth_sequence, &candidate_sequence, config)
    };

    let results: Vec<Result<ScoreAccumulator, ComparisonError>> = if config.parallel {
        ElementKind::ALL.par_iter().map(|kind| run(*kind)).collect()
    } else {
        ElementKind::ALL.iter().map(|kind| run(*kind)).collect()
    };

    let mut merged = ScoreAccumulator::new();
    for result in results {
        merged.merge(result?);
    }
    Ok(merged)
}

fn concat(parts: &[PartSequences], kind: ElementKind) -> Vec<ScoreElement> {
    parts
        .iter()
        .filter_map(|part| part.get(&kind))
        .flat_map(|sequence| sequence.iter().cloned())
        .collect()
}

fn align_category(
    kind: ElementKind,
    truth: &[ScoreElement],
    candidate: &[ScoreElement],
    config: &ComparisonConfig,
) -> Result<ScoreAccumulator, ComparisonError> {
    log::debug!(
        "Aligning {}: {} truth, {} candidate",
        kind,
        truth.len(),
        candidate.len()
    );

    let aligner = AffineGapAligner::new(config.gaps);
    let alignment = match config.strategy {
        AlignmentStrategy::Projection => {
            let truth_keys = project(truth, kind)?;
            let candidate_keys = project(candidate, kind)?;
            let scorer = ExactMatch::new(config.match_score, config.mismatch_score);
            aligner.align(&truth_keys, &candidate_keys, &scorer)?
        }
        AlignmentStrategy::Weighted => {
            aligner.align(truth, candidate, &WeightedElementScore::new(kind))?
        }
    };

    let mut accumulator = ScoreAccumulator::new();
    accumulator.accumulate(alignment.pairs(truth, candidate));
    Ok(accumulator)
}

pub(crate) fn build_metadata(
    truth: &ScoreDocument,
    candidate: &ScoreDocument,
    config: &ComparisonConfig,
    warnings: Vec<String>,
    start_time: Instant,
) -> ComparisonMetadata {
    ComparisonMetadata {
        strategy: config.strategy,
        processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
        truth_parts: truth.part_count(),
        candidate_parts: candidate.part_count(),
        truth_software: truth.software_vendor.clone(),
        candidate_software: candidate.software_vendor.clone(),
        warnings,
        ..ComparisonMetadata::default()
    }
}
