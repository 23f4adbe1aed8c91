//! Attribute-level accumulation of aligned element pairs
//!
//! Turns the pairs rebuilt from an alignment into right/wrong tallies per
//! tracked attribute and a diagnostic log.
//!
//! # Rules
//!
//! - Matched pair of the same kind: each tracked attribute counts right when
//!   equal, otherwise wrong with a diagnostic
//!   `"{truth}=>{candidate}__{field}_{truthValue}_{candidateValue}"`
//! - Set-valued attributes count once per member of the truth set
//! - Element against a gap: every attribute of its kind counts wrong once;
//!   a missing element fails on all its facets at the same time
//! - Matched pair of different kinds: the truth kind's attributes count wrong
//!
//! On finalization only one of the two note-identity attributes (scale step,
//! letter name) is kept: the one with fewer wrong counts.

use std::collections::BTreeMap;

use super::metadata::ComparisonMetadata;
use super::result::{ComparisonReport, ErrorLog, KindReport, ResultCounter};
use crate::config::PitchIdentity;
use crate::score::{Attribute, AttributeValue, ElementKind, ScoreElement};

/// Locator placeholder for the gap side of an unmatched element
const SKIP: &str = "skip adjustment";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    right: u64,
    wrong: u64,
}

/// Right/wrong tallies and diagnostics of one or more category runs
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    tallies: BTreeMap<Attribute, Tally>,
    errors: ErrorLog,
}

impl ScoreAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every pair of an alignment, in order
    pub fn accumulate<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (Option<&'a ScoreElement>, Option<&'a ScoreElement>)>,
    {
        for (truth, candidate) in pairs {
            self.record_pair(truth, candidate);
        }
    }

    /// Record one aligned slot
    ///
    /// `None` on either side marks a gap. A slot with two gaps records nothing.
    pub fn record_pair(&mut self, truth: Option<&ScoreElement>, candidate: Option<&ScoreElement>) {
        match (truth, candidate) {
            (Some(t), Some(c)) if t.kind() == c.kind() => self.compare(t, c),
            (Some(t), Some(c)) => {
                let location = format!("{}=>{}", t.locator(), c.locator());
                for attribute in t.kind().attributes() {
                    self.wrong(*attribute, format!("{}__{}", location, attribute.field()));
                }
            }
            (Some(t), None) => {
                let entry = format!("{}=>{}", t.locator(), SKIP);
                for attribute in t.kind().attributes() {
                    self.wrong(*attribute, entry.clone());
                }
            }
            (None, Some(c)) => {
                let entry = format!("{}=>{}", SKIP, c.locator());
                for attribute in c.kind().attributes() {
                    self.wrong(*attribute, entry.clone());
                }
            }
            (None, None) => {}
        }
    }

    fn compare(&mut self, truth: &ScoreElement, candidate: &ScoreElement) {
        let location = format!("{}=>{}", truth.locator(), candidate.locator());
        for attribute in truth.kind().attributes() {
            let truth_value = attribute.value(truth).unwrap_or(AttributeValue::Absent);
            let candidate_value = attribute.value(candidate).unwrap_or(AttributeValue::Absent);

            match (&truth_value, &candidate_value) {
                (AttributeValue::Set(members), AttributeValue::Set(present)) => {
                    for member in members {
                        if present.contains(member) {
                            self.right(*attribute);
                        } else {
                            self.wrong(
                                *attribute,
                                format!(
                                    "{}__{}_{}_{}",
                                    location,
                                    attribute.field(),
                                    member,
                                    candidate_value
                                ),
                            );
                        }
                    }
                }
                _ if truth_value == candidate_value => self.right(*attribute),
                _ => self.wrong(
                    *attribute,
                    format!(
                        "{}__{}_{}_{}",
                        location,
                        attribute.field(),
                        truth_value,
                        candidate_value
                    ),
                ),
            }
        }
    }

    fn right(&mut self, attribute: Attribute) {
        self.tallies.entry(attribute).or_default().right += 1;
    }

    fn wrong(&mut self, attribute: Attribute, diagnostic: String) {
        self.tallies.entry(attribute).or_default().wrong += 1;
        self.errors.entry(attribute.key()).or_default().push(diagnostic);
    }

    /// Right count of one attribute so far
    pub fn right_count(&self, attribute: Attribute) -> u64 {
        self.tallies.get(&attribute).map_or(0, |t| t.right)
    }

    /// Wrong count of one attribute so far
    pub fn wrong_count(&self, attribute: Attribute) -> u64 {
        self.tallies.get(&attribute).map_or(0, |t| t.wrong)
    }

    /// Diagnostics recorded so far
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Number of diagnostics recorded so far
    pub fn diagnostic_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Add the tallies and diagnostics of another accumulator
    ///
    /// Tallies are summed, so merge order does not change any count.
    /// Diagnostics of `other` are appended after the existing ones.
    pub fn merge(&mut self, other: ScoreAccumulator) {
        for (attribute, tally) in other.tallies {
            let entry = self.tallies.entry(attribute).or_default();
            entry.right += tally.right;
            entry.wrong += tally.wrong;
        }
        for (key, mut diagnostics) in other.errors {
            self.errors.entry(key).or_default().append(&mut diagnostics);
        }
    }

    /// Build the report counters
    ///
    /// # Arguments
    ///
    /// * `tie_break` - Note identity attribute kept when step and letter name
    ///   have the same wrong count
    ///
    /// # Returns
    ///
    /// Report with every kind listed in fixed order, each with its attribute
    /// counters followed by the kind total. Metadata is left at its default.
    pub fn finalize(mut self, tie_break: PitchIdentity) -> ComparisonReport {
        let step_wrong = self.wrong_count(Attribute::NoteStep);
        let name_wrong = self.wrong_count(Attribute::NoteName);
        let dropped = match step_wrong.cmp(&name_wrong) {
            std::cmp::Ordering::Greater => Attribute::NoteStep,
            std::cmp::Ordering::Less => Attribute::NoteName,
            std::cmp::Ordering::Equal => match tie_break {
                PitchIdentity::ScaleStep => Attribute::NoteName,
                PitchIdentity::Letter => Attribute::NoteStep,
            },
        };
        log::debug!(
            "Note identity: step {} wrong, name {} wrong, dropping {:?}",
            step_wrong,
            name_wrong,
            dropped
        );
        self.tallies.remove(&dropped);
        self.errors.remove(&dropped.key());

        let categories = ElementKind::ALL
            .iter()
            .map(|kind| {
                let mut total = ResultCounter::new(kind.total_name(), 0, 0);
                let mut counters: Vec<ResultCounter> = kind
                    .attributes()
                    .iter()
                    .filter(|attribute| **attribute != dropped)
                    .map(|attribute| {
                        let tally = self.tallies.get(attribute).copied().unwrap_or_default();
                        total.right += tally.right;
                        total.wrong += tally.wrong;
                        ResultCounter::new(attribute.result_name(), tally.right, tally.wrong)
                    })
                    .collect();
                counters.push(total);
                KindReport {
                    kind: *kind,
                    counters,
                }
            })
            .collect();

        ComparisonReport {
            categories,
            error_description: self.errors,
            metadata: ComparisonMetadata::default(),
        }
    }
}
