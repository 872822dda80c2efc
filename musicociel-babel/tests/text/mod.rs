use crate::common::load_fixture;
use musicociel_babel::{FormatRegistry, Segment};

#[test]
fn imports_chords_over_lyrics() {
    let registry = FormatRegistry::default();
    let song = registry
        .decode(&load_fixture("amazing-grace.txt"), Some("amazing-grace.txt"), None)
        .unwrap();

    let verse = &song.music.sections[0];
    assert_eq!(verse.name.as_deref(), Some("Verse"));
    assert_eq!(
        verse.lines[1].segments,
        vec![
            Segment::lyrics("That saved a "),
            Segment::chord("D", "wretch like me"),
        ]
    );
}

#[test]
fn export_reproduces_the_fixture() {
    let registry = FormatRegistry::default();
    let song = registry
        .parse(&load_fixture("amazing-grace.txt"), "text")
        .unwrap();
    assert_eq!(
        registry.serialize(&song, "text").unwrap(),
        load_fixture("amazing-grace.txt")
    );
}

#[test]
fn unknown_extension_falls_back_to_detection() {
    let registry = FormatRegistry::default();
    let song = registry
        .decode(&load_fixture("amazing-grace.txt"), Some("song.lyrics"), None)
        .unwrap();
    assert_eq!(song.title, "Amazing Grace");
}
