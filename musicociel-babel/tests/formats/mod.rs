//! Behavior shared across formats.

use crate::common::load_fixture;
use musicociel_babel::FormatRegistry;

#[test]
fn same_song_decodes_identically_from_every_format() {
    let registry = FormatRegistry::default();
    let from_chordpro = registry
        .decode(&load_fixture("amazing-grace.cho"), Some("a.cho"), None)
        .unwrap();
    let from_text = registry
        .decode(&load_fixture("amazing-grace.txt"), Some("b.txt"), None)
        .unwrap();
    assert_eq!(from_chordpro, from_text);

    let json = registry.encode(&from_text, None, None).unwrap();
    let from_json = registry.decode(&json, Some("c.json"), None).unwrap();
    assert_eq!(from_json, from_chordpro);
}

#[test]
fn converts_chordpro_to_text() {
    let registry = FormatRegistry::default();
    let song = registry
        .decode(&load_fixture("amazing-grace.cho"), Some("a.cho"), None)
        .unwrap();
    let text = registry.encode(&song, Some("out.txt"), None).unwrap();
    assert_eq!(text, load_fixture("amazing-grace.txt"));
}
