use crate::common::load_fixture;
use musicociel_babel::{FormatRegistry, Song};

fn amazing_grace() -> Song {
    FormatRegistry::default()
        .decode(&load_fixture("amazing-grace.cho"), Some("amazing-grace.cho"), None)
        .expect("fixture to parse")
}

#[test]
fn imports_metadata_and_sections() {
    let song = amazing_grace();

    assert_eq!(song.title, "Amazing Grace");
    assert_eq!(song.artist.as_deref(), Some("John Newton"));
    assert_eq!(song.music.key.as_deref(), Some("G"));

    let names: Vec<_> = song
        .music
        .sections
        .iter()
        .map(|s| s.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("Verse"), Some("Chorus")]);
    assert_eq!(
        song.chords().collect::<Vec<_>>(),
        vec!["G", "C", "G", "D", "G", "C"]
    );
}

#[test]
fn export_reproduces_the_fixture() {
    let registry = FormatRegistry::default();
    let exported = registry.serialize(&amazing_grace(), "chordpro").unwrap();
    assert_eq!(exported, load_fixture("amazing-grace.cho"));
}

#[test]
fn comments_become_named_sections() {
    let registry = FormatRegistry::default();
    let song = registry
        .parse("{t: Short}\n{c: Intro}\n[Em]\n\n[C]la\n", "chordpro")
        .unwrap();

    insta::assert_snapshot!(registry.serialize(&song, "chordpro").unwrap(), @r###"
    {title: Short}

    {comment: Intro}
    [Em]

    [C]la
    "###);
}
