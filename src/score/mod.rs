//! Score element model
//!
//! - Element value types (notes, rests, persistent markings, spanners, dynamics)
//! - The static registry of tracked attributes per kind

pub mod attribute;
pub mod element;

pub use attribute::{Attribute, AttributeValue};
pub use element::{
    Accidental, BeamType, ClefAttributes, ClefSign, Duration, DynamicAttributes, ElementBody,
    ElementKind, KeySignatureAttributes, Mode, NoteAttributes, Onset, PitchLetter, Placement,
    RestAttributes, ScoreElement, SpannerAttributes, StemDirection, Tie, TieStyle, TieType,
    TimeSignatureAttributes,
};
