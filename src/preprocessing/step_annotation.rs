//! Scale step annotation
//!
//! Readers lose the active key signature for every measure except the one
//! it is written in, so the key-relative scale step of a note cannot be
//! computed while reading. Once key signatures are normalized to one entry per
//! measure, each note is joined to the entry sharing its (part, measure) and a
//! [`StepResolver`] computes the step from the pair.

use std::collections::HashMap;

use crate::score::{KeySignatureAttributes, NoteAttributes, ScoreElement};

/// Computes the transposition-invariant scale step of a note in a key
///
/// Implementations own the music-theory arithmetic (tonic resolution,
/// interval size); the comparison core only performs the join.
pub trait StepResolver: Sync {
    /// Step of `note` in `key`, or `None` when it cannot be determined
    fn scale_step(&self, key: &KeySignatureAttributes, note: &NoteAttributes) -> Option<u8>;
}

/// Annotate notes with the scale step of the key active in their measure
///
/// # Arguments
///
/// * `notes` - Notes of one or more parts
/// * `keys` - Normalized key signatures covering the same parts
/// * `resolver` - Step computation
///
/// # Returns
///
/// Copies of `notes`, in order, with the scale step set where a key entry
/// shares the note's (part, measure). When several entries share a measure
/// the last one wins. Other notes keep their current step.
pub fn annotate_steps(
    notes: &[ScoreElement],
    keys: &[ScoreElement],
    resolver: &dyn StepResolver,
) -> Vec<ScoreElement> {
    let mut active: HashMap<(u32, u32), &KeySignatureAttributes> =
        HashMap::with_capacity(keys.len());
    for key in keys {
        if let Some(attrs) = key.as_key_signature() {
            active.insert((key.part, key.measure), attrs);
        }
    }

    let mut annotated = 0usize;
    let out = notes
        .iter()
        .map(|element| {
            let (Some(note), Some(key)) = (
                element.as_note(),
                active.get(&(element.part, element.measure)),
            ) else {
                return element.clone();
            };
            annotated += 1;
            element.with_scale_step(resolver.scale_step(key, note))
        })
        .collect();

    log::debug!(
        "Annotated {} of {} notes from {} key entries",
        annotated,
        notes.len(),
        keys.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        Accidental, Duration, ElementBody, Mode, Onset, PitchLetter, ScoreElement,
    };

    /// Semitones from the tonic letter to the note letter, accidentals ignored
    struct LetterDistance;

    impl StepResolver for LetterDistance {
        fn scale_step(&self, key: &KeySignatureAttributes, note: &NoteAttributes) -> Option<u8> {
            let tonic = key.tonic.pitch_class() as i16 + key.tonic_accidental.semitones() as i16;
            let pitch = note.letter.pitch_class() as i16;
            Some((pitch - tonic).rem_euclid(12) as u8)
        }
    }

    fn note(part: u32, measure: u32, letter: PitchLetter) -> ScoreElement {
        ScoreElement::new(
            part,
            measure,
            Onset::from_integer(0),
            ElementBody::Note(NoteAttributes::new(letter, 4, Duration::from_integer(1))),
        )
    }

    fn key(part: u32, measure: u32, tonic: PitchLetter) -> ScoreElement {
        ScoreElement::new(
            part,
            measure,
            Onset::from_integer(0),
            ElementBody::KeySignature(KeySignatureAttributes {
                tonic,
                tonic_accidental: Accidental::None,
                mode: Mode::Major,
            }),
        )
    }

    fn step(element: &ScoreElement) -> Option<u8> {
        element.as_note().and_then(|n| n.scale_step)
    }

    #[test]
    fn test_join_on_part_and_measure() {
        let notes = vec![
            note(1, 1, PitchLetter::G),
            note(1, 2, PitchLetter::G),
            note(2, 1, PitchLetter::G),
        ];
        let keys = vec![
            key(1, 1, PitchLetter::C),
            key(1, 2, PitchLetter::G),
            key(2, 1, PitchLetter::D),
        ];

        let out = annotate_steps(&notes, &keys, &LetterDistance);
        assert_eq!(step(&out[0]), Some(7));
        assert_eq!(step(&out[1]), Some(0));
        assert_eq!(step(&out[2]), Some(5));
    }

    #[test]
    fn test_missing_key_leaves_step_unset() {
        let notes = vec![note(1, 3, PitchLetter::E)];
        let keys = vec![key(1, 1, PitchLetter::C)];
        let out = annotate_steps(&notes, &keys, &LetterDistance);
        assert_eq!(step(&out[0]), None);
        assert_eq!(out[0].measure, 3);
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let notes = vec![note(1, 1, PitchLetter::A)];
        let keys = vec![key(1, 1, PitchLetter::C), key(1, 1, PitchLetter::F)];
        let out = annotate_steps(&notes, &keys, &LetterDistance);
        assert_eq!(step(&out[0]), Some(4));
    }
}
