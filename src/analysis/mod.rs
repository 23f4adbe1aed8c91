//! Analysis and result aggregation modules
//!
//! Turns aligned element pairs into the final report:
//! - Attribute accumulation
//! - Partwise comparison with greedy part assignment
//! - Result types
//! - Metadata

pub mod accumulator;
pub mod metadata;
pub mod partwise;
pub mod result;

pub use accumulator::ScoreAccumulator;
pub use metadata::ComparisonMetadata;
pub use partwise::{compare_partwise, PartAssignment, PartwiseReport};
pub use result::{ComparisonReport, ErrorLog, KindReport, ResultCounter};
