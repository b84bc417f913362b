//! The media engine seam.
//!
//! Everything `mediascope` needs from a demuxing/decoding library goes through
//! two traits: [`Engine`] opens inputs and answers registry queries, and
//! [`Demuxer`] is one opened container. Releasing a container is `Drop`.
//!
//! [`libav::FfmpegEngine`] is the production implementation backed by
//! `ffmpeg-next`. [`mock::MockEngine`] is a scripted in-memory engine that
//! records every call, for testing code built on top of this crate without
//! media fixtures.

pub mod libav;
pub mod mock;

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::Path,
};

use ffmpeg_next::{Error as FfmpegError, codec::Id as CodecId, media::Type};

use crate::{metadata::Tags, rational::Rational};

/// Media kind of an elementary stream, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Unknown,
}

impl From<Type> for MediaKind {
    fn from(medium: Type) -> Self {
        match medium {
            Type::Video => MediaKind::Video,
            Type::Audio => MediaKind::Audio,
            Type::Subtitle => MediaKind::Subtitle,
            Type::Data => MediaKind::Data,
            Type::Attachment => MediaKind::Attachment,
            Type::Unknown => MediaKind::Unknown,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Subtitle => "subtitle",
            MediaKind::Data => "data",
            MediaKind::Attachment => "attachment",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Kind-specific codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindParameters {
    Video(VideoParameters),
    Audio(AudioParameters),
    /// Any other kind. The catalog skips these streams.
    Other(MediaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoParameters {
    pub width: u32,
    pub height: u32,
    /// Pixel aspect ratio as stored; may be `0/1` or `0/0` when unknown.
    pub sample_aspect_ratio: Rational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioParameters {
    pub channels: u32,
    pub sample_rate: u32,
}

/// Snapshot of one raw stream's codec parameters and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParameters {
    /// Engine index, 0-based, in container order.
    pub index: usize,
    pub codec_id: CodecId,
    /// FourCC-style codec tag, packed little-endian.
    pub codec_tag: u32,
    pub bit_rate: i64,
    pub time_base: Rational,
    /// Container-reported real base frame rate (`r_frame_rate`).
    pub real_frame_rate: Rational,
    pub kind: KindParameters,
}

impl StreamParameters {
    /// A video stream with square pixels and no bit rate or tag.
    pub fn video(index: usize, codec_id: CodecId, width: u32, height: u32) -> Self {
        Self {
            index,
            codec_id,
            codec_tag: 0,
            bit_rate: 0,
            time_base: Rational::new(1, 90_000),
            real_frame_rate: Rational::UNDEFINED,
            kind: KindParameters::Video(VideoParameters {
                width,
                height,
                sample_aspect_ratio: Rational::new(0, 1),
            }),
        }
    }

    /// An audio stream with no bit rate or tag.
    pub fn audio(index: usize, codec_id: CodecId, channels: u32, sample_rate: u32) -> Self {
        Self {
            index,
            codec_id,
            codec_tag: 0,
            bit_rate: 0,
            time_base: Rational::new(1, i64::from(sample_rate)),
            real_frame_rate: Rational::UNDEFINED,
            kind: KindParameters::Audio(AudioParameters {
                channels,
                sample_rate,
            }),
        }
    }

    /// A stream of any other kind (subtitle, data, ...).
    pub fn other(index: usize, codec_id: CodecId, kind: MediaKind) -> Self {
        Self {
            index,
            codec_id,
            codec_tag: 0,
            bit_rate: 0,
            time_base: Rational::new(1, 1_000),
            real_frame_rate: Rational::UNDEFINED,
            kind: KindParameters::Other(kind),
        }
    }

    /// Set the packed FourCC codec tag.
    pub fn with_codec_tag(mut self, codec_tag: u32) -> Self {
        self.codec_tag = codec_tag;
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: i64) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    /// Set the stream time base.
    pub fn with_time_base(mut self, time_base: Rational) -> Self {
        self.time_base = time_base;
        self
    }

    /// Set the container-reported real frame rate.
    pub fn with_real_frame_rate(mut self, rate: Rational) -> Self {
        self.real_frame_rate = rate;
        self
    }

    /// Set the pixel aspect ratio. No effect on non-video streams.
    pub fn with_sample_aspect_ratio(mut self, ratio: Rational) -> Self {
        if let KindParameters::Video(video) = &mut self.kind {
            video.sample_aspect_ratio = ratio;
        }
        self
    }

    /// Kind of stream these parameters describe.
    pub fn media_kind(&self) -> MediaKind {
        match self.kind {
            KindParameters::Video(_) => MediaKind::Video,
            KindParameters::Audio(_) => MediaKind::Audio,
            KindParameters::Other(kind) => kind,
        }
    }
}

/// A decoder the engine knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderInfo {
    pub id: CodecId,
    /// Declared decoder name (e.g. `"h264"`, `"aac"`).
    pub name: String,
}

/// Opens inputs and answers registry queries.
pub trait Engine {
    /// Allocate a container context and open `path`. Stream info is not yet
    /// read; call [`Demuxer::probe`] next.
    fn open_input(&self, path: &Path) -> Result<Box<dyn Demuxer>, FfmpegError>;

    /// Names of every input and output format, in registry order.
    fn format_names(&self) -> Vec<String>;

    /// Names of every codec, in registry order.
    fn codec_names(&self) -> Vec<String>;
}

/// One opened container. Dropping it releases the container.
pub trait Demuxer {
    /// Read enough of the input to populate per-stream codec parameters.
    fn probe(&mut self) -> Result<(), FfmpegError>;

    /// Every raw stream, in engine order.
    fn streams(&self) -> Vec<StreamParameters>;

    fn tags(&self) -> Tags;

    /// Duration in `AV_TIME_BASE` units; negative when unknown.
    fn duration(&self) -> i64;

    fn bit_rate(&self) -> i64;

    fn format_name(&self) -> String;

    fn find_decoder(&self, codec_id: CodecId) -> Option<DecoderInfo>;

    /// Open `decoder` against stream `index`.
    fn open_decoder(&mut self, index: usize, decoder: &DecoderInfo) -> Result<(), FfmpegError>;

    fn close_decoder(&mut self, index: usize);
}
