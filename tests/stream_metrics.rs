//! Per-stream property tests: FourCC, aspect ratios, frame rates and codec
//! activation.

use ffmpeg_next::codec::Id;
use mediascope::{
    CodecStage, MediaFile, MediaScopeError, Rational,
    engine::{
        StreamParameters,
        mock::{EngineEvent, MockEngine, MockMedia},
    },
};

const PATH: &str = "input.mov";

fn open(engine: &MockEngine) -> MediaFile {
    MediaFile::open_with(engine, PATH).expect("Failed to open mock input")
}

fn single_video(stream: StreamParameters) -> MockEngine {
    MockEngine::new()
        .with_decoder(Id::H264, "h264")
        .with_decoder(Id::MPEG2VIDEO, "mpeg2video")
        .with_media(PATH, MockMedia::new("mov,mp4,m4a,3gp,3g2,mj2").with_stream(stream))
}

#[test]
fn fourcc_from_codec_tag() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 1920, 1080).with_codec_tag(0x3163_7661),
    );
    let file = open(&engine);

    assert_eq!(file.streams().unwrap()[0].fourcc_tag().unwrap(), "avc1");
}

#[test]
fn fourcc_of_untagged_stream_is_empty() {
    let engine = single_video(StreamParameters::video(0, Id::H264, 1920, 1080));
    let file = open(&engine);

    assert_eq!(file.streams().unwrap()[0].fourcc_tag().unwrap(), "");
}

#[test]
fn frame_aspect_ratio_is_unreduced() {
    let engine = single_video(StreamParameters::video(0, Id::H264, 1920, 1080));
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    let frame = video.frame_aspect_ratio().unwrap().unwrap();
    assert_eq!(frame, Rational::new(1920, 1080));
    assert_eq!(frame.reduced(), Rational::new(16, 9));
}

#[test]
fn zero_dimension_has_no_aspect_ratio() {
    let engine = single_video(StreamParameters::video(0, Id::H264, 0, 1080));
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    assert_eq!(video.frame_aspect_ratio().unwrap(), None);
    assert_eq!(video.real_aspect_ratio().unwrap(), None);
}

#[test]
fn unknown_sample_aspect_ratio_means_square_pixels() {
    for stored in [Rational::new(0, 1), Rational::UNDEFINED, Rational::new(4, 0)] {
        let engine = single_video(
            StreamParameters::video(0, Id::H264, 1280, 720).with_sample_aspect_ratio(stored),
        );
        let file = open(&engine);
        let video = file.video_streams().unwrap()[0];

        assert_eq!(video.sample_aspect_ratio().unwrap(), Rational::ONE);
        assert_eq!(
            video.real_aspect_ratio().unwrap(),
            Some(Rational::new(1280, 720))
        );
    }
}

#[test]
fn anamorphic_real_aspect_ratio() {
    let engine = single_video(
        StreamParameters::video(0, Id::MPEG2VIDEO, 720, 480)
            .with_sample_aspect_ratio(Rational::new(8, 9)),
    );
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    assert_eq!(video.sample_aspect_ratio().unwrap(), Rational::new(8, 9));
    let real = video.real_aspect_ratio().unwrap().unwrap();
    assert_eq!(real, Rational::new(5760, 4320));
    assert_eq!(real.reduced(), Rational::new(4, 3));
}

#[test]
fn frame_rate_prefers_real_frame_rate() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 1920, 1080)
            .with_real_frame_rate(Rational::new(30000, 1001))
            .with_time_base(Rational::new(1, 90000)),
    );
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    assert!(!video.is_codec_active().unwrap());
    assert_eq!(video.frame_rate().unwrap(), Rational::new(30000, 1001));
    assert!(video.is_codec_active().unwrap());
}

#[test]
fn frame_rate_falls_back_to_inverted_time_base() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 640, 480).with_time_base(Rational::new(1, 25)),
    );
    let file = open(&engine);

    assert_eq!(
        file.video_streams().unwrap()[0].frame_rate().unwrap(),
        Rational::new(25, 1)
    );
}

#[test]
fn half_zero_real_frame_rate_is_ignored() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 640, 480)
            .with_real_frame_rate(Rational::new(0, 1))
            .with_time_base(Rational::new(1001, 24000)),
    );
    let file = open(&engine);

    assert_eq!(
        file.video_streams().unwrap()[0].frame_rate().unwrap(),
        Rational::new(24000, 1001)
    );
}

#[test]
fn zero_time_base_gives_undefined_frame_rate() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 640, 480).with_time_base(Rational::new(0, 1)),
    );
    let file = open(&engine);

    let rate = file.video_streams().unwrap()[0].frame_rate().unwrap();
    assert!(rate.is_undefined());
}

#[test]
fn codec_is_activated_once() {
    let engine = single_video(StreamParameters::video(0, Id::H264, 640, 480));
    let file = open(&engine);
    let stream = &file.streams().unwrap()[0];

    assert_eq!(stream.codec_name().unwrap(), "h264");
    assert_eq!(stream.codec_name().unwrap(), "h264");
    file.video_streams().unwrap()[0].frame_rate().unwrap();

    assert_eq!(
        engine.count_events(|event| matches!(event, EngineEvent::OpenDecoder { .. })),
        1
    );
}

#[test]
fn plain_properties_do_not_activate_codec() {
    let engine = single_video(
        StreamParameters::video(0, Id::H264, 640, 480).with_bit_rate(1_200_000),
    );
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    assert_eq!(video.width().unwrap(), 640);
    assert_eq!(video.height().unwrap(), 480);
    assert_eq!(video.bit_rate().unwrap(), 1_200_000);
    assert_eq!(video.time_base().unwrap(), Rational::new(1, 90000));
    video.real_aspect_ratio().unwrap();

    assert!(!video.is_codec_active().unwrap());
}

#[test]
fn missing_decoder_cannot_be_found() {
    let engine = single_video(StreamParameters::video(0, Id::VP9, 640, 480));
    let file = open(&engine);
    let video = file.video_streams().unwrap()[0];

    let error = video.codec_name().unwrap_err();
    assert!(matches!(
        error,
        MediaScopeError::Codec {
            stream_index: 0,
            stage: CodecStage::CannotFindCodec,
            ..
        }
    ));
    assert!(matches!(
        video.frame_rate(),
        Err(MediaScopeError::Codec {
            stage: CodecStage::CannotFindCodec,
            ..
        })
    ));
    assert!(!video.is_codec_active().unwrap());
}

#[test]
fn broken_decoder_cannot_be_opened() {
    let engine = MockEngine::new().with_decoder(Id::AAC, "aac").with_media(
        PATH,
        MockMedia::new("mov,mp4,m4a,3gp,3g2,mj2")
            .with_stream(StreamParameters::audio(0, Id::AAC, 2, 48000))
            .with_broken_decoder(0),
    );
    let file = open(&engine);

    let error = file.streams().unwrap()[0].codec_name().unwrap_err();
    assert!(matches!(
        error,
        MediaScopeError::Codec {
            stage: CodecStage::CannotOpenCodec,
            ..
        }
    ));
    assert!(error.to_string().contains("cannot open codec"));
}

#[test]
fn audio_properties() {
    let engine = MockEngine::new().with_decoder(Id::OPUS, "opus").with_media(
        PATH,
        MockMedia::new("ogg").with_stream(
            StreamParameters::audio(0, Id::OPUS, 6, 48000)
                .with_codec_tag(0x7375_704f)
                .with_bit_rate(256_000),
        ),
    );
    let file = open(&engine);
    let audio = file.audio_streams().unwrap()[0];

    assert_eq!(audio.channels().unwrap(), 6);
    assert_eq!(audio.sample_rate().unwrap(), 48000);
    assert_eq!(audio.bit_rate().unwrap(), 256_000);
    assert_eq!(audio.time_base().unwrap(), Rational::new(1, 48000));
    assert_eq!(audio.fourcc_tag().unwrap(), "Opus");
    assert_eq!(audio.codec_name().unwrap(), "opus");
}
