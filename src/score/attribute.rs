//! Tracked attribute registry
//!
//! Every element kind has a fixed, ordered list of attributes that the
//! accumulator compares. The registry is static: [`ElementKind::attributes`]
//! returns the list, and [`Attribute::value`] is the accessor for each entry.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::element::{ElementBody, ElementKind, Onset, ScoreElement};

/// A single attribute value read from an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// The element does not record this attribute
    Absent,
    /// Integer value
    Integer(i64),
    /// Textual value
    Text(String),
    /// Rational value (durations, onsets)
    Rational(Onset),
    /// Set value, compared member by member
    Set(BTreeSet<String>),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Absent => f.write_str("None"),
            AttributeValue::Integer(value) => write!(f, "{}", value),
            AttributeValue::Text(value) => f.write_str(value),
            AttributeValue::Rational(value) => write!(f, "{}", value),
            AttributeValue::Set(members) => {
                let joined: Vec<&str> = members.iter().map(String::as_str).collect();
                f.write_str(&joined.join("+"))
            }
        }
    }
}

impl<T: ToString> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => AttributeValue::Text(v.to_string()),
            None => AttributeValue::Absent,
        }
    }
}

fn text(value: impl ToString) -> AttributeValue {
    AttributeValue::Text(value.to_string())
}

fn set<T: ToString>(members: impl IntoIterator<Item = T>) -> AttributeValue {
    AttributeValue::Set(members.into_iter().map(|m| m.to_string()).collect())
}

/// A tracked attribute of one element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    /// Key-relative scale step of a note
    NoteStep,
    /// Letter name of a note
    NoteName,
    /// Note duration
    NoteDuration,
    /// Note octave
    NoteOctave,
    /// Note accidental
    NoteAccidental,
    /// Note articulations (set-valued)
    NoteArticulation,
    /// Note stem direction
    NoteStemDirection,
    /// Note beams (set-valued)
    NoteBeam,
    /// Note voice
    NoteVoice,
    /// Note tie style
    NoteTieStyle,
    /// Note tie type
    NoteTieType,
    /// Note tie placement
    NoteTiePlacement,
    /// Rest articulations (set-valued)
    RestArticulation,
    /// Rest duration
    RestDuration,
    /// Rest voice
    RestVoice,
    /// Time signature numerator
    TimeSignatureNumerator,
    /// Time signature denominator
    TimeSignatureDenominator,
    /// Key signature tonic
    KeySignatureStep,
    /// Key signature mode
    KeySignatureMode,
    /// Key signature onset
    KeySignatureOnset,
    /// Clef sign
    ClefName,
    /// Clef line
    ClefLine,
    /// Clef octave change
    ClefOctave,
    /// Clef onset
    ClefOnset,
    /// Spanner type
    SpannerName,
    /// Spanner placement
    SpannerPlacement,
    /// Spanner length
    SpannerLength,
    /// Dynamic onset
    DynamicOnset,
    /// Dynamic name
    DynamicName,
}

const NOTE_ATTRIBUTES: &[Attribute] = &[
    Attribute::NoteStep,
    Attribute::NoteName,
    Attribute::NoteDuration,
    Attribute::NoteOctave,
    Attribute::NoteAccidental,
    Attribute::NoteArticulation,
    Attribute::NoteStemDirection,
    Attribute::NoteBeam,
    Attribute::NoteVoice,
    Attribute::NoteTieStyle,
    Attribute::NoteTieType,
    Attribute::NoteTiePlacement,
];

const REST_ATTRIBUTES: &[Attribute] = &[
    Attribute::RestArticulation,
    Attribute::RestDuration,
    Attribute::RestVoice,
];

const TIME_SIGNATURE_ATTRIBUTES: &[Attribute] = &[
    Attribute::TimeSignatureNumerator,
    Attribute::TimeSignatureDenominator,
];

const KEY_SIGNATURE_ATTRIBUTES: &[Attribute] = &[
    Attribute::KeySignatureStep,
    Attribute::KeySignatureMode,
    Attribute::KeySignatureOnset,
];

const CLEF_ATTRIBUTES: &[Attribute] = &[
    Attribute::ClefName,
    Attribute::ClefLine,
    Attribute::ClefOctave,
    Attribute::ClefOnset,
];

const SPANNER_ATTRIBUTES: &[Attribute] = &[
    Attribute::SpannerName,
    Attribute::SpannerPlacement,
    Attribute::SpannerLength,
];

const DYNAMIC_ATTRIBUTES: &[Attribute] = &[Attribute::DynamicOnset, Attribute::DynamicName];

impl ElementKind {
    /// Tracked attributes of this kind, in report order
    pub fn attributes(&self) -> &'static [Attribute] {
        match self {
            ElementKind::Note => NOTE_ATTRIBUTES,
            ElementKind::Rest => REST_ATTRIBUTES,
            ElementKind::TimeSignature => TIME_SIGNATURE_ATTRIBUTES,
            ElementKind::KeySignature => KEY_SIGNATURE_ATTRIBUTES,
            ElementKind::Clef => CLEF_ATTRIBUTES,
            ElementKind::Spanner => SPANNER_ATTRIBUTES,
            ElementKind::Dynamic => DYNAMIC_ATTRIBUTES,
        }
    }
}

impl Attribute {
    /// Kind this attribute belongs to
    pub fn kind(&self) -> ElementKind {
        use Attribute::*;
        match self {
            NoteStep | NoteName | NoteDuration | NoteOctave | NoteAccidental | NoteArticulation
            | NoteStemDirection | NoteBeam | NoteVoice | NoteTieStyle | NoteTieType
            | NoteTiePlacement => ElementKind::Note,
            RestArticulation | RestDuration | RestVoice => ElementKind::Rest,
            TimeSignatureNumerator | TimeSignatureDenominator => ElementKind::TimeSignature,
            KeySignatureStep | KeySignatureMode | KeySignatureOnset => ElementKind::KeySignature,
            ClefName | ClefLine | ClefOctave | ClefOnset => ElementKind::Clef,
            SpannerName | SpannerPlacement | SpannerLength => ElementKind::Spanner,
            DynamicOnset | DynamicName => ElementKind::Dynamic,
        }
    }

    /// Short field name used inside diagnostics (e.g. "octave")
    pub fn field(&self) -> &'static str {
        use Attribute::*;
        match self {
            NoteStep | KeySignatureStep => "step",
            NoteName | ClefName | SpannerName | DynamicName => "name",
            NoteDuration | RestDuration => "duration",
            NoteOctave | ClefOctave => "octave",
            NoteAccidental => "accidental",
            NoteArticulation | RestArticulation => "articulation",
            NoteStemDirection => "stemdirection",
            NoteBeam => "beam",
            NoteVoice | RestVoice => "voice",
            NoteTieStyle => "tiestyle",
            NoteTieType => "tietype",
            NoteTiePlacement => "tieplacement",
            TimeSignatureNumerator => "numerator",
            TimeSignatureDenominator => "denominator",
            KeySignatureMode => "mode",
            KeySignatureOnset | ClefOnset | DynamicOnset => "onset",
            ClefLine => "line",
            SpannerPlacement => "placement",
            SpannerLength => "length",
        }
    }

    /// Error log key: "{category}_{field}" (e.g. "notes_octave")
    pub fn key(&self) -> String {
        format!("{}_{}", self.kind().category(), self.field())
    }

    /// Counter name in the report (e.g. "NoteOctaveResult")
    pub fn result_name(&self) -> &'static str {
        use Attribute::*;
        match self {
            NoteStep => "NoteStepResult",
            NoteName => "NoteNameResult",
            NoteDuration => "NoteDurationResult",
            NoteOctave => "NoteOctaveResult",
            NoteAccidental => "NoteAccidentalResult",
            NoteArticulation => "NoteArticulationResult",
            NoteStemDirection => "NoteStemDirectionResult",
            NoteBeam => "NoteBeamResult",
            NoteVoice => "NoteVoiceResult",
            NoteTieStyle => "NoteTieStyle",
            NoteTieType => "NoteTieType",
            NoteTiePlacement => "NoteTiePlacement",
            RestArticulation => "RestArticulationResult",
            RestDuration => "RestDurationResult",
            RestVoice => "RestVoiceResult",
            TimeSignatureNumerator => "TimeSignatureNumeratorResult",
            TimeSignatureDenominator => "TimeSignatureDenominatorResult",
            KeySignatureStep => "KeySignatureStepResult",
            KeySignatureMode => "KeySignatureModeResult",
            KeySignatureOnset => "KeySignatureOnsetResult",
            ClefName => "ClefNameResult",
            ClefLine => "ClefLineResult",
            ClefOctave => "ClefOctaveResult",
            ClefOnset => "ClefOnsetResult",
            SpannerName => "SpannerNameResult",
            SpannerPlacement => "SpannerPlacementResult",
            SpannerLength => "SpannerLengthResult",
            DynamicOnset => "DynamicOnsetResult",
            DynamicName => "DynamicNameResult",
        }
    }

    /// Set-valued attributes are compared per member of the truth set
    pub fn is_set_valued(&self) -> bool {
        matches!(
            self,
            Attribute::NoteArticulation | Attribute::NoteBeam | Attribute::RestArticulation
        )
    }

    /// Read this attribute from an element.
    ///
    /// Returns `None` when the element is of another kind.
    pub fn value(&self, element: &ScoreElement) -> Option<AttributeValue> {
        use Attribute::*;
        let value = match (self, &element.body) {
            (NoteStep, ElementBody::Note(n)) => match n.scale_step {
                Some(step) => AttributeValue::Integer(i64::from(step)),
                None => AttributeValue::Absent,
            },
            (NoteName, ElementBody::Note(n)) => text(n.letter),
            (NoteDuration, ElementBody::Note(n)) => AttributeValue::Rational(n.duration),
            (NoteOctave, ElementBody::Note(n)) => match n.octave {
                Some(octave) => AttributeValue::Integer(i64::from(octave)),
                None => AttributeValue::Absent,
            },
            (NoteAccidental, ElementBody::Note(n)) => text(n.accidental),
            (NoteArticulation, ElementBody::Note(n)) => set(&n.articulations),
            (NoteStemDirection, ElementBody::Note(n)) => text(n.stem_direction),
            (NoteBeam, ElementBody::Note(n)) => set(&n.beams),
            (NoteVoice, ElementBody::Note(n)) => AttributeValue::Integer(i64::from(n.voice)),
            (NoteTieStyle, ElementBody::Note(n)) => n.tie.map(|t| t.style).into(),
            (NoteTieType, ElementBody::Note(n)) => n.tie.map(|t| t.tie_type).into(),
            (NoteTiePlacement, ElementBody::Note(n)) => n.tie.and_then(|t| t.placement).into(),
            (RestArticulation, ElementBody::Rest(r)) => set(&r.articulations),
            (RestDuration, ElementBody::Rest(r)) => AttributeValue::Rational(r.duration),
            (RestVoice, ElementBody::Rest(r)) => AttributeValue::Integer(i64::from(r.voice)),
            (TimeSignatureNumerator, ElementBody::TimeSignature(t)) => {
                AttributeValue::Integer(i64::from(t.numerator))
            }
            (TimeSignatureDenominator, ElementBody::TimeSignature(t)) => {
                AttributeValue::Integer(i64::from(t.denominator))
            }
            (KeySignatureStep, ElementBody::KeySignature(k)) => text(k.tonic_name()),
            (KeySignatureMode, ElementBody::KeySignature(k)) => text(k.mode),
            (KeySignatureOnset, ElementBody::KeySignature(_))
            | (ClefOnset, ElementBody::Clef(_))
            | (DynamicOnset, ElementBody::Dynamic(_)) => AttributeValue::Rational(element.onset),
            (ClefName, ElementBody::Clef(c)) => text(c.sign),
            (ClefLine, ElementBody::Clef(c)) => match c.line {
                Some(line) => AttributeValue::Integer(i64::from(line)),
                None => AttributeValue::Absent,
            },
            (ClefOctave, ElementBody::Clef(c)) => AttributeValue::Integer(i64::from(c.octave_change)),
            (SpannerName, ElementBody::Spanner(s)) => text(&s.name),
            (SpannerPlacement, ElementBody::Spanner(s)) => s.placement.into(),
            (SpannerLength, ElementBody::Spanner(s)) => AttributeValue::Integer(i64::from(s.length)),
            (DynamicName, ElementBody::Dynamic(d)) => text(&d.name),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::element::{
        BeamType, ClefAttributes, ClefSign, Duration, NoteAttributes, PitchLetter, Tie, TieStyle,
        TieType,
    };

    fn note() -> ScoreElement {
        let mut attrs = NoteAttributes::new(PitchLetter::F, 5, Duration::new(1, 2));
        attrs.beams.insert(BeamType::Start);
        attrs.articulations.insert("staccato".to_string());
        attrs.tie = Some(Tie {
            tie_type: TieType::Start,
            style: TieStyle::Normal,
            placement: None,
        });
        ScoreElement::new(1, 1, Onset::from_integer(0), ElementBody::Note(attrs))
    }

    #[test]
    fn test_registry_matches_kinds() {
        for kind in ElementKind::ALL {
            assert!(!kind.attributes().is_empty());
            for attribute in kind.attributes() {
                assert_eq!(attribute.kind(), kind, "{:?} filed under {:?}", attribute, kind);
            }
        }
    }

    #[test]
    fn test_keys_and_names() {
        assert_eq!(Attribute::NoteOctave.key(), "notes_octave");
        assert_eq!(Attribute::TimeSignatureNumerator.key(), "timeSignatures_numerator");
        assert_eq!(Attribute::ClefName.result_name(), "ClefNameResult");
        assert_eq!(Attribute::NoteTieStyle.result_name(), "NoteTieStyle");
        assert_eq!(Attribute::NoteTieType.result_name(), "NoteTieType");
        assert_eq!(Attribute::NoteTiePlacement.result_name(), "NoteTiePlacement");
    }

    #[test]
    fn test_note_values() {
        let n = note();
        assert_eq!(Attribute::NoteStep.value(&n), Some(AttributeValue::Absent));
        assert_eq!(Attribute::NoteName.value(&n), Some(AttributeValue::Text("F".into())));
        assert_eq!(Attribute::NoteOctave.value(&n), Some(AttributeValue::Integer(5)));
        assert_eq!(
            Attribute::NoteDuration.value(&n),
            Some(AttributeValue::Rational(Duration::new(1, 2)))
        );
        assert_eq!(Attribute::NoteTieType.value(&n), Some(AttributeValue::Text("start".into())));
        assert_eq!(Attribute::NoteTiePlacement.value(&n), Some(AttributeValue::Absent));
        match Attribute::NoteBeam.value(&n) {
            Some(AttributeValue::Set(members)) => {
                assert!(members.contains("start"));
                assert_eq!(members.len(), 1);
            }
            other => panic!("expected a set, got {:?}", other),
        }
    }

    #[test]
    fn test_value_of_other_kind_is_none() {
        let clef = ScoreElement::new(
            1,
            1,
            Onset::from_integer(0),
            ElementBody::Clef(ClefAttributes {
                sign: ClefSign::F,
                line: Some(4),
                octave_change: 0,
            }),
        );
        assert_eq!(Attribute::NoteOctave.value(&clef), None);
        assert_eq!(Attribute::ClefLine.value(&clef), Some(AttributeValue::Integer(4)));
    }

    #[test]
    fn test_set_display_joins_members() {
        let value = set(["tenuto", "accent"]);
        assert_eq!(value.to_string(), "accent+tenuto");
        assert_eq!(AttributeValue::Absent.to_string(), "None");
    }
}
