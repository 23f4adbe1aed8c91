//! Persistent marking normalization
//!
//! Engraving software records clefs, key signatures and time signatures
//! inconsistently: some files repeat the marking in every measure, others
//! only where it changes, others once per system. A marking keeps acting on
//! every measure until overridden, so before alignment each part's sparse
//! list is expanded to one representative per measure.
//!
//! # Algorithm
//!
//! Single forward pass with a read cursor and a target measure `m` starting at 1:
//!
//! 1. Next input measure equals `m`: consume it, advance `m`
//! 2. Next input measure is greater: synthesize a filler (back-fill from the
//!    next input element while the output is empty, otherwise forward-fill from
//!    the last output element), advance `m`, keep the input
//! 3. Next input measure is smaller: consume it without advancing `m`
//!    (late or duplicate correction for a measure already passed)
//! 4. Input exhausted: forward-fill until `m` passes `max_measure`
//!
//! # Example
//!
//! ```
//! use stratum_score::preprocessing::normalization::normalize_persistent;
//! use stratum_score::score::{ClefAttributes, ClefSign, ElementBody, Onset, ScoreElement};
//!
//! let treble = ElementBody::Clef(ClefAttributes { sign: ClefSign::G, line: Some(2), octave_change: 0 });
//! let clefs = vec![ScoreElement::new(1, 1, Onset::from_integer(0), treble)];
//!
//! let dense = normalize_persistent(&clefs, 4)?;
//! assert_eq!(dense.iter().map(|c| c.measure).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
//! # Ok::<(), stratum_score::ComparisonError>(())
//! ```

use std::cmp::Ordering;

use crate::error::ComparisonError;
use crate::score::ScoreElement;

/// Expand a sparse list of persistent markings of one part to one element per measure
///
/// # Arguments
///
/// * `elements` - Markings of a single kind and part, ordered by measure
/// * `max_measure` - Number of measures in the score
///
/// # Returns
///
/// Dense list covering measures `1..=max_measure`. It may be longer than
/// `max_measure` when duplicate entries were consumed along the way.
///
/// # Errors
///
/// Returns `ComparisonError::NormalizationUnderflow` if a filler is needed but
/// the input is empty, so there is nothing to clone.
pub fn normalize_persistent(
    elements: &[ScoreElement],
    max_measure: u32,
) -> Result<Vec<ScoreElement>, ComparisonError> {
    log::debug!(
        "Normalizing {} persistent markings to {} measures",
        elements.len(),
        max_measure
    );

    if elements.is_empty() && max_measure > 0 {
        return Err(ComparisonError::NormalizationUnderflow(format!(
            "no marking to expand over {} measures",
            max_measure
        )));
    }

    let mut output: Vec<ScoreElement> = Vec::with_capacity(max_measure as usize);
    let mut cursor = 0;
    let mut measure = 1;

    while measure <= max_measure {
        let Some(next) = elements.get(cursor) else {
            // Input exhausted: keep repeating the last marking
            let filler = forward_fill(&output)?;
            output.push(filler);
            measure += 1;
            continue;
        };

        match next.measure.cmp(&measure) {
            Ordering::Equal => {
                output.push(next.clone());
                cursor += 1;
                measure += 1;
            }
            Ordering::Greater => {
                let filler = if output.is_empty() {
                    // Nothing seen yet: the first marking also governs the measures before it
                    next.with_measure(measure)
                } else {
                    forward_fill(&output)?
                };
                output.push(filler);
                measure += 1;
            }
            Ordering::Less => {
                output.push(next.clone());
                cursor += 1;
            }
        }
    }

    if cursor < elements.len() {
        log::debug!(
            "Dropped {} markings beyond measure {}",
            elements.len() - cursor,
            max_measure
        );
    }

    Ok(output)
}

/// Clone of the last output element, one measure later
fn forward_fill(output: &[ScoreElement]) -> Result<ScoreElement, ComparisonError> {
    output
        .last()
        .map(|last| last.with_measure(last.measure + 1))
        .ok_or_else(|| {
            ComparisonError::NormalizationUnderflow("no previous marking to repeat".to_string())
        })
}
