//! Comparison result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metadata::ComparisonMetadata;
use crate::score::ElementKind;

/// Diagnostics per attribute key (e.g. "notes_octave"), in the order found
pub type ErrorLog = BTreeMap<String, Vec<String>>;

/// Right/wrong tally of one attribute, or the total of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounter {
    /// Counter name (e.g. "NoteOctaveResult", "NoteTotalResult")
    pub name: String,

    /// Comparisons that agreed
    pub right: u64,

    /// Comparisons that disagreed, including missing and extra elements
    pub wrong: u64,
}

impl ResultCounter {
    /// Counter with the given tallies
    pub fn new(name: impl Into<String>, right: u64, wrong: u64) -> Self {
        Self {
            name: name.into(),
            right,
            wrong,
        }
    }

    /// Number of comparisons counted
    pub fn count(&self) -> u64 {
        self.right + self.wrong
    }

    /// Share of right comparisons in [0, 1], or `None` when nothing was counted
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_score::analysis::result::ResultCounter;
    ///
    /// assert_eq!(ResultCounter::new("NoteTotalResult", 3, 1).accuracy(), Some(0.75));
    /// assert_eq!(ResultCounter::new("RestTotalResult", 0, 0).accuracy(), None);
    /// ```
    pub fn accuracy(&self) -> Option<f64> {
        if self.count() == 0 {
            None
        } else {
            Some(self.right as f64 / self.count() as f64)
        }
    }
}

/// Counters of one element kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindReport {
    /// Element kind
    pub kind: ElementKind,

    /// Attribute counters in registry order, followed by the kind total
    pub counters: Vec<ResultCounter>,
}

impl KindReport {
    /// Total counter of this kind (always the last entry)
    pub fn total(&self) -> Option<&ResultCounter> {
        self.counters.last()
    }

    /// Counter by name
    pub fn counter(&self, name: &str) -> Option<&ResultCounter> {
        self.counters.iter().find(|c| c.name == name)
    }
}

/// Complete comparison result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Per-kind counters, one entry per kind in fixed kind order
    pub categories: Vec<KindReport>,

    /// Diagnostics per attribute key
    pub error_description: ErrorLog,

    /// Comparison metadata
    pub metadata: ComparisonMetadata,
}

impl ComparisonReport {
    /// Counters of one kind
    pub fn category(&self, kind: ElementKind) -> Option<&KindReport> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    /// Total counter of one kind
    pub fn total(&self, kind: ElementKind) -> Option<&ResultCounter> {
        self.category(kind).and_then(KindReport::total)
    }

    /// Wrong count summed over every kind total
    pub fn total_wrong(&self) -> u64 {
        self.categories
            .iter()
            .filter_map(KindReport::total)
            .map(|t| t.wrong)
            .sum()
    }

    /// Number of diagnostics in the error log
    pub fn diagnostic_count(&self) -> usize {
        self.error_description.values().map(Vec::len).sum()
    }

    /// Copy of this report keeping only the total counter of each kind
    pub fn totals_only(&self) -> ComparisonReport {
        let categories = self
            .categories
            .iter()
            .map(|category| KindReport {
                kind: category.kind,
                counters: category.total().cloned().into_iter().collect(),
            })
            .collect();
        ComparisonReport {
            categories,
            error_description: self.error_description.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
