//! Container-level property tests: tags and their fallbacks, duration, bit
//! rate and format name.

use ffmpeg_next::ffi::AV_TIME_BASE;
use mediascope::{
    MediaFile,
    engine::mock::{MockEngine, MockMedia},
};

const PATH: &str = "song.m4a";

fn open_with(media: MockMedia) -> (MockEngine, MediaFile) {
    let engine = MockEngine::new().with_media(PATH, media);
    let file = MediaFile::open_with(&engine, PATH).expect("Failed to open mock input");
    (engine, file)
}

#[test]
fn direct_tags() {
    let (_engine, file) = open_with(
        MockMedia::new("ipod")
            .with_tag("title", "Sintel")
            .with_tag("copyright", "CC-BY")
            .with_tag("comment", "Rendered with Blender")
            .with_tag("album", "Durian")
            .with_tag("genre", "Animation")
            .with_tag("track", "3/12"),
    );

    assert_eq!(file.title().unwrap().as_deref(), Some("Sintel"));
    assert_eq!(file.copyright().unwrap().as_deref(), Some("CC-BY"));
    assert_eq!(file.comment().unwrap().as_deref(), Some("Rendered with Blender"));
    assert_eq!(file.album().unwrap().as_deref(), Some("Durian"));
    assert_eq!(file.genre().unwrap().as_deref(), Some("Animation"));
    assert_eq!(file.track().unwrap().as_deref(), Some("3/12"));
    assert_eq!(file.track_number().unwrap(), Some(3));
}

#[test]
fn missing_tags_are_none() {
    let (_engine, file) = open_with(MockMedia::new("ipod"));

    assert_eq!(file.title().unwrap(), None);
    assert_eq!(file.author().unwrap(), None);
    assert_eq!(file.year().unwrap(), None);
    assert_eq!(file.year_number().unwrap(), None);
    assert_eq!(file.metadata("encoder").unwrap(), None);
    assert!(file.tags().unwrap().is_empty());
}

#[test]
fn author_falls_back_to_artist() {
    let (_engine, file) =
        open_with(MockMedia::new("ipod").with_tag("artist", "Blender Foundation"));
    assert_eq!(file.author().unwrap().as_deref(), Some("Blender Foundation"));
}

#[test]
fn author_is_preferred_over_artist() {
    let (_engine, file) = open_with(
        MockMedia::new("asf")
            .with_tag("artist", "Performer")
            .with_tag("author", "Writer"),
    );
    assert_eq!(file.author().unwrap().as_deref(), Some("Writer"));
}

#[test]
fn year_falls_back_to_date() {
    let (_engine, file) = open_with(MockMedia::new("ogg").with_tag("date", "2010-09-27"));

    assert_eq!(file.year().unwrap().as_deref(), Some("2010-09-27"));
    assert_eq!(file.year_number().unwrap(), Some(2010));
}

#[test]
fn lookups_are_exact() {
    let (_engine, file) = open_with(MockMedia::new("ipod").with_tag("Title", "Upper"));

    assert_eq!(file.title().unwrap(), None);
    assert_eq!(file.metadata("Title").unwrap().as_deref(), Some("Upper"));
}

#[test]
fn empty_value_is_returned_as_stored() {
    let (_engine, file) = open_with(MockMedia::new("ipod").with_tag("comment", ""));
    assert_eq!(file.comment().unwrap().as_deref(), Some(""));
}

#[test]
fn tags_snapshot_keeps_engine_order() {
    let (_engine, file) = open_with(
        MockMedia::new("ipod")
            .with_tag("major_brand", "M4A ")
            .with_tag("encoder", "Lavf60.3.100")
            .with_tag("title", "Intro"),
    );

    let tags = file.tags().unwrap();
    let keys: Vec<&str> = tags.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, ["major_brand", "encoder", "title"]);
}

#[test]
fn duration_in_seconds() {
    let (_engine, file) = open_with(MockMedia::new("ipod").with_duration(5_500_000));

    assert_eq!(file.duration_micros().unwrap(), 5_500_000);
    assert!((file.duration().unwrap() - 5.5).abs() < 1e-9);
}

#[test]
fn unknown_duration_is_passed_through() {
    let sentinel = i64::MIN;
    let (_engine, file) = open_with(MockMedia::new("mpegts").with_duration(sentinel));

    let seconds = file.duration().unwrap();
    assert!(seconds < 0.0);
    assert_eq!(seconds, sentinel as f64 / AV_TIME_BASE as f64);
}

#[test]
fn bit_rate_and_format_name() {
    let (_engine, file) = open_with(MockMedia::new("ipod").with_bit_rate(256_000));

    assert_eq!(file.bit_rate().unwrap(), 256_000);
    assert_eq!(file.format_name().unwrap(), "ipod");
}
