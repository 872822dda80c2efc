use crate::common::load_fixture;
use musicociel_babel::theory::{Alteration, Note, CHORD_TYPES};
use musicociel_babel::{FormatRegistry, Line, Section, Segment, SheetMusic, TransformConfig};
use proptest::prelude::*;

fn music_of(chords: &[String]) -> SheetMusic {
    SheetMusic {
        key: None,
        sections: vec![Section {
            name: None,
            lines: vec![Line::new(
                chords.iter().map(|c| Segment::chord(c, "la ")).collect(),
            )],
        }],
    }
}

fn sharp_chord() -> impl Strategy<Value = String> {
    (0u8..12, 0..CHORD_TYPES.len(), proptest::option::of(0u8..12)).prop_map(
        |(root, quality, bass)| {
            let mut chord = format!(
                "{}{}",
                Note::from_pitch_class(root, Alteration::Sharp),
                CHORD_TYPES[quality].name
            );
            if let Some(bass) = bass {
                chord.push('/');
                chord.push_str(&Note::from_pitch_class(bass, Alteration::Sharp).to_string());
            }
            chord
        },
    )
}

proptest! {
    #[test]
    fn transposing_there_and_back_is_identity(
        chords in proptest::collection::vec(sharp_chord(), 1..8),
        semitones in -11i32..=11,
        reset in any::<bool>(),
    ) {
        let up = TransformConfig {
            transpose_semitones: Some(semitones),
            default_alteration: Some(Alteration::Sharp),
            reset_alterations: reset,
            ..Default::default()
        };
        let down = TransformConfig {
            transpose_semitones: Some(-semitones),
            ..up
        };

        let original = music_of(&chords);
        let moved = musicociel_babel::transforms::transform(original.clone(), &up).unwrap();
        let back = musicociel_babel::transforms::transform(moved, &down).unwrap();
        prop_assert_eq!(back, original);
    }
}

#[test]
fn transposes_a_whole_song_with_sharps() {
    let registry = FormatRegistry::default();
    let mut song = registry
        .decode(&load_fixture("amazing-grace.txt"), Some("a.txt"), None)
        .unwrap();
    let config = TransformConfig {
        transpose_semitones: Some(2),
        default_alteration: Some(Alteration::Sharp),
        ..Default::default()
    };
    musicociel_babel::transforms::transform_song(&mut song, &config).unwrap();

    insta::assert_snapshot!(registry.serialize(&song, "text").unwrap(), @r###"
    Title: Amazing Grace
    Artist: John Newton
    Key: A

    [Verse]
    A       D          A
    Amazing grace, how sweet the sound
                 E
    That saved a wretch like me

    [Chorus]
    A          D
    I once was lost
    "###);
}
