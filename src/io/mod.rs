//! Score I/O modules
//!
//! The reader boundary and a serde_json reader for pre-extracted documents.

pub mod json;
pub mod reader;

pub use json::JsonScoreReader;
pub use reader::{ScoreDocument, ScorePart, ScoreReader};
