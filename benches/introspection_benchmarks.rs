//! Benchmarks for container and stream introspection.
//!
//! Run with: cargo bench
//!
//! The mock-engine groups always run. The FFmpeg group requires fixture files
//! from `tests/fixtures/generate_fixtures.sh`.

use std::{hint::black_box, path::Path};

use criterion::{Criterion, criterion_group, criterion_main};
use ffmpeg_next::codec::Id;
use mediascope::{
    FfmpegLogLevel, MediaFile, MediaKind, MediaProbe, Rational,
    engine::{
        StreamParameters,
        mock::{MockEngine, MockMedia},
    },
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";
const MOCK_PATH: &str = "bench.mkv";

fn mock_engine(stream_pairs: usize) -> MockEngine {
    let mut media = MockMedia::new("matroska,webm")
        .with_duration(600_000_000)
        .with_tag("title", "Benchmark")
        .with_tag("artist", "mediascope");

    for pair in 0..stream_pairs {
        media = media
            .with_stream(
                StreamParameters::video(pair * 3, Id::H264, 1920, 1080)
                    .with_real_frame_rate(Rational::new(24000, 1001))
                    .with_codec_tag(0x3163_7661),
            )
            .with_stream(StreamParameters::audio(pair * 3 + 1, Id::AAC, 2, 48000))
            .with_stream(StreamParameters::other(
                pair * 3 + 2,
                Id::SUBRIP,
                MediaKind::Subtitle,
            ));
    }

    MockEngine::new()
        .with_decoder(Id::H264, "h264")
        .with_decoder(Id::AAC, "aac")
        .with_media(MOCK_PATH, media)
}

fn benchmark_catalog(criterion: &mut Criterion) {
    let engine = mock_engine(8);

    criterion.bench_function("open and build catalog (24 streams)", |bencher| {
        bencher.iter(|| {
            let file = MediaFile::open_with(&engine, MOCK_PATH).unwrap();
            black_box(file.streams().unwrap().len());
        });
    });

    let file = MediaFile::open_with(&engine, MOCK_PATH).unwrap();
    criterion.bench_function("lookup stream by index", |bencher| {
        bencher.iter(|| black_box(file.stream(black_box(22)).unwrap().index().unwrap()));
    });
}

fn benchmark_properties(criterion: &mut Criterion) {
    let engine = mock_engine(1);
    let file = MediaFile::open_with(&engine, MOCK_PATH).unwrap();
    let video = file.video_streams().unwrap()[0];

    criterion.bench_function("author tag with fallback", |bencher| {
        bencher.iter(|| black_box(file.author().unwrap()));
    });

    criterion.bench_function("real aspect ratio", |bencher| {
        bencher.iter(|| black_box(video.real_aspect_ratio().unwrap()));
    });

    criterion.bench_function("frame rate (decoder already active)", |bencher| {
        video.frame_rate().unwrap();
        bencher.iter(|| black_box(video.frame_rate().unwrap()));
    });
}

fn benchmark_mock_probe(criterion: &mut Criterion) {
    let engine = mock_engine(4);

    criterion.bench_function("probe report (12 streams, mock)", |bencher| {
        bencher.iter(|| black_box(MediaProbe::probe_with(&engine, MOCK_PATH).unwrap()));
    });
}

fn benchmark_ffmpeg_probe(criterion: &mut Criterion) {
    mediascope::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping FFmpeg benchmarks: fixture not found");
        return;
    }

    criterion.bench_function("probe sample_video.mp4", |bencher| {
        bencher.iter(|| black_box(MediaProbe::probe(SAMPLE_VIDEO).unwrap()));
    });

    criterion.bench_function("open and read frame rate", |bencher| {
        bencher.iter(|| {
            let file = MediaFile::open(SAMPLE_VIDEO).unwrap();
            black_box(file.video_streams().unwrap()[0].frame_rate().unwrap());
        });
    });
}

criterion_group!(
    benches,
    benchmark_catalog,
    benchmark_properties,
    benchmark_mock_probe,
    benchmark_ffmpeg_probe
);
criterion_main!(benches);
