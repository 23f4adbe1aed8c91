//! Integration tests for score comparison

use std::path::PathBuf;

use stratum_score::score::{
    Accidental, ClefAttributes, ClefSign, Duration, ElementBody, KeySignatureAttributes, Mode,
    NoteAttributes, Onset, PitchLetter,
};
use stratum_score::{
    compare_partwise, compare_scores, AlignmentStrategy, ComparisonConfig, ElementKind,
    JsonScoreReader, PitchIdentity, ScoreDocument, ScoreElement, ScorePart, ScoreReader,
    StepResolver,
};

/// Semitones from the tonic to the note, octave removed
struct ChromaticSteps;

impl StepResolver for ChromaticSteps {
    fn scale_step(&self, key: &KeySignatureAttributes, note: &NoteAttributes) -> Option<u8> {
        let tonic = key.tonic.pitch_class() as i16 + key.tonic_accidental.semitones() as i16;
        let pitch = note.letter.pitch_class() as i16 + note.accidental.semitones() as i16;
        Some((pitch - tonic).rem_euclid(12) as u8)
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn load_fixtures() -> (ScoreDocument, ScoreDocument) {
    let reader = JsonScoreReader::new();
    let truth = reader
        .read(&fixture_path("truth_two_measures.json"))
        .expect("Failed to load truth fixture");
    let candidate = reader
        .read(&fixture_path("candidate_two_measures.json"))
        .expect("Failed to load candidate fixture");
    (truth, candidate)
}

fn note(measure: u32, onset: u32, letter: PitchLetter) -> ScoreElement {
    ScoreElement::new(
        1,
        measure,
        Onset::from_integer(onset),
        ElementBody::Note(NoteAttributes::new(letter, 4, Duration::from_integer(1))),
    )
}

/// One part in C major, treble clef, with the given notes
fn single_part(notes: Vec<ScoreElement>) -> ScoreDocument {
    let key = ScoreElement::new(
        1,
        1,
        Onset::from_integer(0),
        ElementBody::KeySignature(KeySignatureAttributes {
            tonic: PitchLetter::C,
            tonic_accidental: Accidental::None,
            mode: Mode::Major,
        }),
    );
    let clef = ScoreElement::new(
        1,
        1,
        Onset::from_integer(0),
        ElementBody::Clef(ClefAttributes {
            sign: ClefSign::G,
            line: Some(2),
            octave_change: 0,
        }),
    );
    ScoreDocument {
        software_vendor: None,
        parts: vec![ScorePart {
            notes,
            key_signatures: vec![key],
            clefs: vec![clef],
            ..ScorePart::default()
        }],
    }
}

fn c_major_run() -> Vec<ScoreElement> {
    vec![
        note(1, 0, PitchLetter::C),
        note(1, 1, PitchLetter::D),
        note(1, 2, PitchLetter::E),
        note(1, 3, PitchLetter::F),
    ]
}

#[test]
fn test_identical_scores_have_no_errors() {
    init_logger();
    let truth = single_part(c_major_run());
    let candidate = single_part(c_major_run());

    for strategy in [AlignmentStrategy::Projection, AlignmentStrategy::Weighted] {
        let config = ComparisonConfig {
            strategy,
            ..ComparisonConfig::default()
        };
        let report = compare_scores(&truth, &candidate, &ChromaticSteps, &config)
            .expect("Comparison should succeed");

        assert_eq!(report.total_wrong(), 0, "{:?} strategy", strategy);
        assert!(report.error_description.is_empty());
        for category in &report.categories {
            for counter in &category.counters {
                assert_eq!(counter.wrong, 0, "{} in {:?}", counter.name, strategy);
            }
        }
    }
}

#[test]
fn test_deleted_note_is_one_missing_symbol() {
    init_logger();
    let truth = single_part(c_major_run());
    let mut run = c_major_run();
    run.remove(1);
    let candidate = single_part(run);

    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &ComparisonConfig::default())
        .expect("Comparison should succeed");

    let notes = report.category(ElementKind::Note).unwrap();
    // Every surviving note attribute of D4 fails exactly once
    for counter in &notes.counters[..notes.counters.len() - 1] {
        assert_eq!(counter.wrong, 1, "{}", counter.name);
    }
    assert_eq!(
        report.error_description["notes_octave"],
        vec!["1-1-1=>skip adjustment".to_string()]
    );
    // The other three notes are fully right
    let octave = notes.counter("NoteOctaveResult").unwrap();
    assert_eq!(octave.right, 3);
    assert_eq!(report.total(ElementKind::Clef).unwrap().wrong, 0);
}

#[test]
fn test_fixture_comparison() {
    init_logger();
    let (truth, candidate) = load_fixtures();

    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &ComparisonConfig::default())
        .expect("Comparison should succeed");

    // D4 missing, G4 read an octave too high
    let notes = report.category(ElementKind::Note).unwrap();
    assert_eq!(notes.counter("NoteOctaveResult").unwrap().wrong, 2);
    assert!(notes.counter("NoteStepResult").is_some());
    assert!(notes.counter("NoteNameResult").is_none());
    assert_eq!(notes.total().unwrap().wrong, 12);
    assert_eq!(
        report.error_description["notes_octave"],
        vec![
            "1-1-1=>skip adjustment".to_string(),
            "1-2-0=>1-2-0__octave_4_5".to_string(),
        ]
    );

    // A clef repeated in measure 2 is normalized away
    assert_eq!(report.total(ElementKind::Clef).unwrap().wrong, 0);
    assert_eq!(report.total(ElementKind::Rest).unwrap().wrong, 0);
    assert_eq!(report.total(ElementKind::KeySignature).unwrap().wrong, 0);
    assert_eq!(report.total(ElementKind::TimeSignature).unwrap().right, 4);

    assert_eq!(
        report.metadata.truth_software.as_deref(),
        Some("Reference Engraver 2.4")
    );
    assert_eq!(
        report.metadata.candidate_software.as_deref(),
        Some("OMR Scanner 0.9")
    );
    assert!(report.metadata.processing_time_ms >= 0.0);
}

#[test]
fn test_weighted_strategy_on_fixture() {
    init_logger();
    let (truth, candidate) = load_fixtures();
    let config = ComparisonConfig {
        strategy: AlignmentStrategy::Weighted,
        ..ComparisonConfig::default()
    };

    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &config)
        .expect("Comparison should succeed");

    // Leading gaps cost only their extension: C4 is deleted at the border and
    // D4 is paired with the candidate C4 (step and name wrong, octave right)
    let notes = report.category(ElementKind::Note).unwrap();
    assert_eq!(notes.counter("NoteOctaveResult").unwrap().wrong, 2);
    assert_eq!(notes.counter("NoteStepResult").unwrap().wrong, 2);
    assert_eq!(notes.total().unwrap().wrong, 13);
    assert_eq!(
        report.error_description["notes_step"],
        vec![
            "1-1-0=>skip adjustment".to_string(),
            "1-1-1=>1-1-0__step_2_0".to_string(),
        ]
    );
    assert_eq!(report.total(ElementKind::Clef).unwrap().wrong, 0);
}

#[test]
fn test_letter_tie_break() {
    init_logger();
    let truth = single_part(c_major_run());
    let mut run = c_major_run();
    run.remove(2);
    let candidate = single_part(run);
    let config = ComparisonConfig {
        pitch_identity_tie_break: PitchIdentity::Letter,
        ..ComparisonConfig::default()
    };

    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &config)
        .expect("Comparison should succeed");
    let notes = report.category(ElementKind::Note).unwrap();
    assert!(notes.counter("NoteNameResult").is_some());
    assert!(notes.counter("NoteStepResult").is_none());
    assert!(!report.error_description.contains_key("notes_step"));
}

#[test]
fn test_missing_persistent_kind_counts_as_missing() {
    init_logger();
    let truth = single_part(c_major_run());
    let mut candidate = single_part(c_major_run());
    candidate.parts[0].clefs.clear();

    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &ComparisonConfig::default())
        .expect("Comparison should succeed");

    // One measure of treble clef missing: every clef attribute wrong once
    let clefs = report.category(ElementKind::Clef).unwrap();
    assert_eq!(clefs.total().unwrap().wrong, 4);
    assert!(report
        .metadata
        .warnings
        .iter()
        .any(|w| w.starts_with("candidate part 1 has no clefs")));
}

#[test]
fn test_totals_only_report_serializes() {
    init_logger();
    let (truth, candidate) = load_fixtures();
    let report = compare_scores(&truth, &candidate, &ChromaticSteps, &ComparisonConfig::default())
        .expect("Comparison should succeed")
        .totals_only();

    let json = serde_json::to_value(&report).expect("Report should serialize");
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);
    for category in categories {
        assert_eq!(category["counters"].as_array().unwrap().len(), 1);
    }
    assert_eq!(json["categories"][0]["counters"][0]["name"], "NoteTotalResult");
    assert_eq!(json["metadata"]["strategy"], "Projection");
}

#[test]
fn test_partwise_matches_typewise_for_one_part() {
    init_logger();
    let (truth, candidate) = load_fixtures();
    let config = ComparisonConfig::default();

    let typewise = compare_scores(&truth, &candidate, &ChromaticSteps, &config)
        .expect("Comparison should succeed");
    let partwise = compare_partwise(&truth, &candidate, &ChromaticSteps, &config)
        .expect("Partwise comparison should succeed");

    assert_eq!(partwise.assignments.len(), 1);
    assert_eq!(partwise.assignments[0].truth_part, Some(1));
    assert_eq!(partwise.assignments[0].candidate_part, Some(1));
    assert_eq!(partwise.report.categories, typewise.categories);
    assert_eq!(partwise.report.error_description, typewise.error_description);
}
