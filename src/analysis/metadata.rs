//! Comparison metadata structures

use serde::{Deserialize, Serialize};

use crate::config::AlignmentStrategy;

/// Comparison metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Alignment strategy used
    pub strategy: AlignmentStrategy,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Number of parts in the truth score
    pub truth_parts: usize,

    /// Number of parts in the candidate score
    pub candidate_parts: usize,

    /// Software that produced the truth score, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth_software: Option<String>,

    /// Software that produced the candidate score, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_software: Option<String>,

    /// Warnings raised during comparison (skipped normalization, part count mismatch, ...)
    pub warnings: Vec<String>,
}

impl Default for ComparisonMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            strategy: AlignmentStrategy::Projection,
            processing_time_ms: 0.0,
            truth_parts: 0,
            candidate_parts: 0,
            truth_software: None,
            candidate_software: None,
            warnings: vec![],
        }
    }
}
