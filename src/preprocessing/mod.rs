//! Score preprocessing modules
//!
//! This module prepares reader output for alignment:
//! - Normalization of persistent markings (one per measure)
//! - Scale step annotation of notes from the normalized key signatures

pub mod normalization;
pub mod step_annotation;

pub use normalization::normalize_persistent;
pub use step_annotation::{annotate_steps, StepResolver};
