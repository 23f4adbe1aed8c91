//! Score element value types
//!
//! A [`ScoreElement`] is one notated fact located in a part: a note, rest,
//! time signature, key signature, clef, spanner, or dynamic. Elements are
//! created once by a reader and never mutated; normalization and step
//! annotation derive new values through copy-with-override constructors.

use std::collections::BTreeSet;
use std::fmt;

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

/// Offset of an element inside its measure, in quarter lengths
pub type Onset = Ratio<u32>;

/// Length of a musical event, in quarter lengths
pub type Duration = Ratio<u32>;

/// Kind of a score element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Pitched musical event
    Note,
    /// Silent musical event
    Rest,
    /// Meter marking
    TimeSignature,
    /// Key marking
    KeySignature,
    /// Clef marking
    Clef,
    /// Marking spanning several elements (slurs, hairpins, ...)
    Spanner,
    /// Dynamic marking
    Dynamic,
}

impl ElementKind {
    /// Every kind, in report order
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Note,
        ElementKind::Rest,
        ElementKind::TimeSignature,
        ElementKind::KeySignature,
        ElementKind::Clef,
        ElementKind::Spanner,
        ElementKind::Dynamic,
    ];

    /// Category name used in reports (e.g. "notes", "timeSignatures")
    pub fn category(&self) -> &'static str {
        match self {
            ElementKind::Note => "notes",
            ElementKind::Rest => "rests",
            ElementKind::TimeSignature => "timeSignatures",
            ElementKind::KeySignature => "keySignatures",
            ElementKind::Clef => "clefs",
            ElementKind::Spanner => "spanners",
            ElementKind::Dynamic => "dynamics",
        }
    }

    /// Name of the kind's total counter (e.g. "NoteTotalResult")
    pub fn total_name(&self) -> &'static str {
        match self {
            ElementKind::Note => "NoteTotalResult",
            ElementKind::Rest => "RestTotalResult",
            ElementKind::TimeSignature => "TimeSignatureTotalResult",
            ElementKind::KeySignature => "KeySignatureTotalResult",
            ElementKind::Clef => "ClefTotalResult",
            ElementKind::Spanner => "SpannerTotalResult",
            ElementKind::Dynamic => "DynamicTotalResult",
        }
    }

    /// Persistent markings keep acting on later measures until overridden
    pub fn is_persistent(&self) -> bool {
        matches!(
            self,
            ElementKind::TimeSignature | ElementKind::KeySignature | ElementKind::Clef
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Diatonic letter name of a pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchLetter {
    /// C
    C,
    /// D
    D,
    /// E
    E,
    /// F
    F,
    /// G
    G,
    /// A
    A,
    /// B
    B,
}

impl PitchLetter {
    /// Pitch class of the natural letter (C = 0, ..., B = 11)
    pub fn pitch_class(&self) -> u8 {
        match self {
            PitchLetter::C => 0,
            PitchLetter::D => 2,
            PitchLetter::E => 4,
            PitchLetter::F => 5,
            PitchLetter::G => 7,
            PitchLetter::A => 9,
            PitchLetter::B => 11,
        }
    }
}

impl fmt::Display for PitchLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PitchLetter::C => "C",
            PitchLetter::D => "D",
            PitchLetter::E => "E",
            PitchLetter::F => "F",
            PitchLetter::G => "G",
            PitchLetter::A => "A",
            PitchLetter::B => "B",
        };
        f.write_str(name)
    }
}

/// Pitch alteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accidental {
    /// No alteration written
    #[default]
    None,
    /// Explicit natural sign
    Natural,
    /// Sharp
    Sharp,
    /// Flat
    Flat,
    /// Double sharp
    DoubleSharp,
    /// Double flat
    DoubleFlat,
}

impl Accidental {
    /// Semitone offset from the natural letter
    pub fn semitones(&self) -> i8 {
        match self {
            Accidental::None | Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
            Accidental::DoubleSharp => 2,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Suffix used when spelling a pitch name (e.g. "#" in "F#")
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::None | Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::DoubleSharp => "##",
            Accidental::DoubleFlat => "bb",
        }
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accidental::None => "none",
            Accidental::Natural => "natural",
            Accidental::Sharp => "sharp",
            Accidental::Flat => "flat",
            Accidental::DoubleSharp => "double-sharp",
            Accidental::DoubleFlat => "double-flat",
        };
        f.write_str(name)
    }
}

/// Direction of a note stem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StemDirection {
    /// No direction recorded
    #[default]
    Unspecified,
    /// Stem up
    Up,
    /// Stem down
    Down,
    /// Explicitly stemless
    NoStem,
    /// Stems in both directions
    Double,
}

impl fmt::Display for StemDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StemDirection::Unspecified => "unspecified",
            StemDirection::Up => "up",
            StemDirection::Down => "down",
            StemDirection::NoStem => "noStem",
            StemDirection::Double => "double",
        };
        f.write_str(name)
    }
}

/// How a note's beam connects to its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeamType {
    /// Beam begins on this note
    Start,
    /// Beam passes through this note
    Continue,
    /// Beam ends on this note
    Stop,
    /// Partial (hook) beam
    Partial,
}

impl fmt::Display for BeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BeamType::Start => "start",
            BeamType::Continue => "continue",
            BeamType::Stop => "stop",
            BeamType::Partial => "partial",
        };
        f.write_str(name)
    }
}

/// Placement above or below the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Above the staff
    Above,
    /// Below the staff
    Below,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Above => f.write_str("above"),
            Placement::Below => f.write_str("below"),
        }
    }
}

/// Role of a tie on a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieType {
    /// Tie starts here
    Start,
    /// Tie ends here
    Stop,
    /// Tie ends and restarts here
    Continue,
    /// Let-ring tie
    LetRing,
    /// Continued let-ring tie
    ContinueLetRing,
}

impl fmt::Display for TieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieType::Start => "start",
            TieType::Stop => "stop",
            TieType::Continue => "continue",
            TieType::LetRing => "let-ring",
            TieType::ContinueLetRing => "continue-let-ring",
        };
        f.write_str(name)
    }
}

/// Line style of a tie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieStyle {
    /// Solid
    #[default]
    Normal,
    /// Dotted
    Dotted,
    /// Dashed
    Dashed,
    /// Not drawn
    Hidden,
}

impl fmt::Display for TieStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieStyle::Normal => "normal",
            TieStyle::Dotted => "dotted",
            TieStyle::Dashed => "dashed",
            TieStyle::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// Tie attached to a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tie {
    /// Role of the tie
    pub tie_type: TieType,
    /// Line style
    #[serde(default)]
    pub style: TieStyle,
    /// Placement, when the source records one
    #[serde(default)]
    pub placement: Option<Placement>,
}

/// Tonality of a key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => f.write_str("major"),
            Mode::Minor => f.write_str("minor"),
        }
    }
}

/// Clef sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClefSign {
    /// Treble family
    G,
    /// Bass family
    F,
    /// Alto/tenor family
    C,
    /// Percussion clef
    #[serde(rename = "percussion")]
    Percussion,
    /// Tablature clef
    #[serde(rename = "TAB")]
    Tab,
    /// No clef drawn
    #[serde(rename = "none")]
    None,
}

impl fmt::Display for ClefSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClefSign::G => "G",
            ClefSign::F => "F",
            ClefSign::C => "C",
            ClefSign::Percussion => "percussion",
            ClefSign::Tab => "TAB",
            ClefSign::None => "none",
        };
        f.write_str(name)
    }
}

fn default_voice() -> u32 {
    1
}

/// Attributes of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAttributes {
    /// Semitones above the tonic of the active key, octave removed (0-11).
    /// Unset until step annotation joins the note to a key signature.
    #[serde(default)]
    pub scale_step: Option<u8>,
    /// Letter name
    pub letter: PitchLetter,
    /// Length in quarter lengths
    pub duration: Duration,
    /// Octave number (middle C is C4)
    #[serde(default)]
    pub octave: Option<i8>,
    /// Written alteration
    #[serde(default)]
    pub accidental: Accidental,
    /// Articulation names (staccato, tenuto, accent, ...)
    #[serde(default)]
    pub articulations: BTreeSet<String>,
    /// Stem direction
    #[serde(default)]
    pub stem_direction: StemDirection,
    /// Beam connections; a set so repeated partial beams count once
    #[serde(default)]
    pub beams: BTreeSet<BeamType>,
    /// Voice within the staff
    #[serde(default = "default_voice")]
    pub voice: u32,
    /// Tie, if any
    #[serde(default)]
    pub tie: Option<Tie>,
}

impl NoteAttributes {
    /// Note with the given pitch and length and every other attribute at its default
    pub fn new(letter: PitchLetter, octave: i8, duration: Duration) -> Self {
        Self {
            scale_step: None,
            letter,
            duration,
            octave: Some(octave),
            accidental: Accidental::None,
            articulations: BTreeSet::new(),
            stem_direction: StemDirection::Unspecified,
            beams: BTreeSet::new(),
            voice: 1,
            tie: None,
        }
    }
}

/// Attributes of a rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestAttributes {
    /// Length in quarter lengths
    pub duration: Duration,
    /// Voice within the staff
    #[serde(default = "default_voice")]
    pub voice: u32,
    /// Articulation names (fermata, ...)
    #[serde(default)]
    pub articulations: BTreeSet<String>,
}

/// Attributes of a time signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignatureAttributes {
    /// Beats per measure
    pub numerator: u32,
    /// Beat unit
    pub denominator: u32,
}

/// Attributes of a key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySignatureAttributes {
    /// Tonic letter
    pub tonic: PitchLetter,
    /// Tonic alteration
    #[serde(default)]
    pub tonic_accidental: Accidental,
    /// Major or minor
    pub mode: Mode,
}

impl KeySignatureAttributes {
    /// Spelled tonic (e.g. "F#", "Bb")
    pub fn tonic_name(&self) -> String {
        format!("{}{}", self.tonic, self.tonic_accidental.symbol())
    }
}

/// Attributes of a clef
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClefAttributes {
    /// Clef sign
    pub sign: ClefSign,
    /// Staff line the clef sits on
    #[serde(default)]
    pub line: Option<u8>,
    /// Octave transposition (-1 for treble-8vb, ...)
    #[serde(default)]
    pub octave_change: i8,
}

/// Attributes of a spanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpannerAttributes {
    /// Spanner type (slur, crescendo, ...)
    pub name: String,
    /// Placement, when recorded
    #[serde(default)]
    pub placement: Option<Placement>,
    /// Number of spanned elements
    pub length: u32,
}

/// Attributes of a dynamic marking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicAttributes {
    /// Long name (e.g. "forte")
    pub name: String,
}

/// Kind-specific part of a score element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementBody {
    /// Note attributes
    Note(NoteAttributes),
    /// Rest attributes
    Rest(RestAttributes),
    /// Time signature attributes
    TimeSignature(TimeSignatureAttributes),
    /// Key signature attributes
    KeySignature(KeySignatureAttributes),
    /// Clef attributes
    Clef(ClefAttributes),
    /// Spanner attributes
    Spanner(SpannerAttributes),
    /// Dynamic attributes
    Dynamic(DynamicAttributes),
}

impl ElementBody {
    /// Kind of this body
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Note(_) => ElementKind::Note,
            ElementBody::Rest(_) => ElementKind::Rest,
            ElementBody::TimeSignature(_) => ElementKind::TimeSignature,
            ElementBody::KeySignature(_) => ElementKind::KeySignature,
            ElementBody::Clef(_) => ElementKind::Clef,
            ElementBody::Spanner(_) => ElementKind::Spanner,
            ElementBody::Dynamic(_) => ElementKind::Dynamic,
        }
    }
}

/// One notated fact located in a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreElement {
    /// Instrument part, 1-based
    pub part: u32,
    /// Measure number, 1-based
    pub measure: u32,
    /// Offset inside the measure
    #[serde(default = "zero_onset")]
    pub onset: Onset,
    /// Kind-specific attributes
    #[serde(flatten)]
    pub body: ElementBody,
}

fn zero_onset() -> Onset {
    Onset::from_integer(0)
}

impl ScoreElement {
    /// Create a new element
    pub fn new(part: u32, measure: u32, onset: Onset, body: ElementBody) -> Self {
        Self {
            part,
            measure,
            onset,
            body,
        }
    }

    /// Kind of this element
    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    /// Location string used in diagnostics: "{part}-{measure}-{onset}"
    pub fn locator(&self) -> String {
        format!("{}-{}-{}", self.part, self.measure, self.onset)
    }

    /// Copy of this element moved to another measure
    pub fn with_measure(&self, measure: u32) -> Self {
        Self {
            measure,
            ..self.clone()
        }
    }

    /// Copy of this element with the note scale step replaced.
    /// Elements other than notes are returned unchanged.
    pub fn with_scale_step(&self, scale_step: Option<u8>) -> Self {
        let mut out = self.clone();
        if let ElementBody::Note(note) = &mut out.body {
            note.scale_step = scale_step;
        }
        out
    }

    /// Note attributes, if this is a note
    pub fn as_note(&self) -> Option<&NoteAttributes> {
        match &self.body {
            ElementBody::Note(note) => Some(note),
            _ => None,
        }
    }

    /// Key signature attributes, if this is a key signature
    pub fn as_key_signature(&self) -> Option<&KeySignatureAttributes> {
        match &self.body {
            ElementBody::KeySignature(key) => Some(key),
            _ => None,
        }
    }
}
