//! One-shot media probing.
//!
//! [`MediaProbe`] opens a file, reads every container and stream property
//! into an owned [`MediaReport`], and closes the file again. Reports are plain
//! data (`Send`, `Clone`) and stay valid after the file is gone, which makes
//! them the right shape for batch inspection and for handing results across
//! threads.
//!
//! For lazy, per-property access keep a [`MediaFile`] open instead.

use std::path::{Path, PathBuf};

use crate::{
    container::MediaFile,
    engine::{Engine, MediaKind, libav::FfmpegEngine},
    error::Result,
    metadata::Tags,
    rational::Rational,
    stream::Stream,
    validation::{self, ValidationReport},
};

/// Everything known about one media file.
#[derive(Debug, Clone)]
#[must_use]
pub struct MediaReport {
    pub path: PathBuf,
    /// Demuxer short name (e.g. `"matroska,webm"`).
    pub format: String,
    /// Duration in seconds; negative if the container does not know it.
    pub duration_seconds: f64,
    /// Container bit rate in bits per second.
    pub bit_rate: i64,
    pub tags: Tags,
    /// Video and audio streams, in container order.
    pub streams: Vec<StreamReport>,
    /// Raw stream count, including kinds that are not exposed.
    pub stream_count: usize,
}

/// Properties of one stream.
#[derive(Debug, Clone)]
pub struct StreamReport {
    pub index: usize,
    /// Decoder name, `None` if the decoder could not be activated.
    pub codec: Option<String>,
    pub fourcc: String,
    pub bit_rate: i64,
    pub details: StreamDetails,
}

/// Kind-specific part of a [`StreamReport`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamDetails {
    Video {
        width: u32,
        height: u32,
        frame_aspect_ratio: Option<Rational>,
        sample_aspect_ratio: Rational,
        real_aspect_ratio: Option<Rational>,
        /// `None` if the decoder could not be activated.
        frame_rate: Option<Rational>,
    },
    Audio {
        channels: u32,
        sample_rate: u32,
    },
}

impl StreamReport {
    /// Video or audio, from the details variant.
    pub fn kind(&self) -> MediaKind {
        match self.details {
            StreamDetails::Video { .. } => MediaKind::Video,
            StreamDetails::Audio { .. } => MediaKind::Audio,
        }
    }
}

impl MediaReport {
    /// Read every property of an open file.
    ///
    /// A stream whose decoder cannot be activated is still reported, with
    /// its codec (and frame rate) left empty.
    pub fn from_file(file: &MediaFile) -> Result<Self> {
        let catalog = file.catalog()?;
        let streams = catalog
            .streams()
            .iter()
            .map(stream_report)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: file.path().to_path_buf(),
            format: file.format_name()?,
            duration_seconds: file.duration()?,
            bit_rate: file.bit_rate()?,
            tags: file.tags()?,
            streams,
            stream_count: catalog.stream_count(),
        })
    }

    /// Reports of video streams only.
    pub fn video_streams(&self) -> impl Iterator<Item = &StreamReport> {
        self.streams
            .iter()
            .filter(|stream| stream.kind() == MediaKind::Video)
    }

    /// Reports of audio streams only.
    pub fn audio_streams(&self) -> impl Iterator<Item = &StreamReport> {
        self.streams
            .iter()
            .filter(|stream| stream.kind() == MediaKind::Audio)
    }

    /// Check the report for structural problems.
    pub fn validate(&self) -> ValidationReport {
        validation::validate_report(self)
    }
}

fn stream_report(stream: &Stream) -> Result<StreamReport> {
    let codec = match stream.codec_name() {
        Ok(name) => Some(name),
        Err(error @ crate::MediaScopeError::Codec { .. }) => {
            log::warn!("{error}");
            None
        }
        Err(error) => return Err(error),
    };

    let details = match stream {
        Stream::Video(video) => StreamDetails::Video {
            width: video.width()?,
            height: video.height()?,
            frame_aspect_ratio: video.frame_aspect_ratio()?,
            sample_aspect_ratio: video.sample_aspect_ratio()?,
            real_aspect_ratio: video.real_aspect_ratio()?,
            frame_rate: match codec {
                Some(_) => Some(video.frame_rate()?),
                None => None,
            },
        },
        Stream::Audio(audio) => StreamDetails::Audio {
            channels: audio.channels()?,
            sample_rate: audio.sample_rate()?,
        },
    };

    Ok(StreamReport {
        index: stream.engine_index(),
        codec,
        fourcc: stream.fourcc_tag()?,
        bit_rate: stream.bit_rate()?,
        details,
    })
}

/// One-shot probing entry points.
///
/// # Example
///
/// ```no_run
/// use mediascope::MediaProbe;
///
/// let report = MediaProbe::probe("input.mp4")?;
/// println!("{}: {:.2}s, {} streams", report.format, report.duration_seconds, report.streams.len());
/// # Ok::<(), mediascope::MediaScopeError>(())
/// ```
pub struct MediaProbe;

impl MediaProbe {
    /// Probe one file with the FFmpeg engine.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaReport> {
        Self::probe_with(&FfmpegEngine, path)
    }

    /// Probe one file with an arbitrary engine.
    pub fn probe_with<E, P>(engine: &E, path: P) -> Result<MediaReport>
    where
        E: Engine + ?Sized,
        P: AsRef<Path>,
    {
        let mut file = MediaFile::open_with(engine, path)?;
        let report = MediaReport::from_file(&file);
        file.close();
        report
    }

    /// Probe several files. Failures are reported per entry rather than
    /// aborting the batch.
    pub fn probe_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<MediaReport>> {
        paths.iter().map(Self::probe).collect()
    }

    /// Probe several files on the rayon thread pool.
    ///
    /// Every worker opens its own [`MediaFile`]; nothing is shared between
    /// threads. Results come back in input order.
    #[cfg(feature = "rayon")]
    pub fn probe_many_parallel<P: AsRef<Path> + Sync>(paths: &[P]) -> Vec<Result<MediaReport>> {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

        paths.par_iter().map(Self::probe).collect()
    }
}
