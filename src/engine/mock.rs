//! Scripted in-memory engine.
//!
//! [`MockEngine`] serves containers described by [`MockMedia`] values and
//! records every engine call as an [`EngineEvent`], so tests can assert on
//! resource ordering (decoders closed before their container, containers
//! closed exactly once) without FFmpeg fixtures on disk.
//!
//! # Example
//!
//! ```
//! use ffmpeg_next::codec::Id;
//! use mediascope::{
//!     MediaFile,
//!     engine::{
//!         StreamParameters,
//!         mock::{EngineEvent, MockEngine, MockMedia},
//!     },
//! };
//!
//! let engine = MockEngine::new().with_media(
//!     "clip.mp4",
//!     MockMedia::new("mov,mp4,m4a,3gp,3g2,mj2")
//!         .with_stream(StreamParameters::video(0, Id::H264, 1920, 1080)),
//! );
//!
//! let mut file = MediaFile::open_with(&engine, "clip.mp4")?;
//! assert_eq!(file.video_streams()?.len(), 1);
//! file.close();
//! assert_eq!(
//!     engine.events().last(),
//!     Some(&EngineEvent::CloseInput("clip.mp4".into()))
//! );
//! # Ok::<(), mediascope::MediaScopeError>(())
//! ```

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use ffmpeg_next::{Error as FfmpegError, codec::Id as CodecId};

use crate::{
    engine::{DecoderInfo, Demuxer, Engine, StreamParameters},
    metadata::Tags,
};

/// One call observed by a [`MockEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    OpenInput(PathBuf),
    Probe(PathBuf),
    OpenDecoder { index: usize, name: String },
    CloseDecoder(usize),
    CloseInput(PathBuf),
}

/// Description of one container served by a [`MockEngine`].
#[derive(Debug, Clone)]
pub struct MockMedia {
    format_name: String,
    duration: i64,
    bit_rate: i64,
    tags: Tags,
    streams: Vec<StreamParameters>,
    probe_fails: bool,
    broken_decoders: Vec<usize>,
}

impl MockMedia {
    /// A container with no streams, no tags and an unknown duration.
    pub fn new(format_name: impl Into<String>) -> Self {
        Self {
            format_name: format_name.into(),
            duration: 0,
            bit_rate: 0,
            tags: Tags::new(),
            streams: Vec::new(),
            probe_fails: false,
            broken_decoders: Vec::new(),
        }
    }

    /// Duration in microseconds (`AV_TIME_BASE` units).
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: i64) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    /// Append a container tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Append a stream. Its declared index is what lookups use.
    pub fn with_stream(mut self, stream: StreamParameters) -> Self {
        self.streams.push(stream);
        self
    }

    /// Make stream-info probing fail.
    pub fn with_failing_probe(mut self) -> Self {
        self.probe_fails = true;
        self
    }

    /// Make opening a decoder on stream `index` fail.
    pub fn with_broken_decoder(mut self, index: usize) -> Self {
        self.broken_decoders.push(index);
        self
    }
}

/// In-memory [`Engine`] with an event log shared by all its containers.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    media: HashMap<PathBuf, MockMedia>,
    decoders: Vec<DecoderInfo>,
    format_names: Vec<String>,
    codec_names: Vec<String>,
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl MockEngine {
    /// An engine that knows no files and no decoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scripted container under `path`.
    pub fn with_media(mut self, path: impl Into<PathBuf>, media: MockMedia) -> Self {
        self.media.insert(path.into(), media);
        self
    }

    /// Register a decoder for `id`. Codec ids without a registered decoder
    /// fail activation with "cannot find codec".
    pub fn with_decoder(mut self, id: CodecId, name: impl Into<String>) -> Self {
        self.decoders.push(DecoderInfo {
            id,
            name: name.into(),
        });
        self
    }

    /// Names returned by `format_names`.
    pub fn with_format_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.format_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_codec_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codec_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count_events(&self, predicate: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }
}

impl Engine for MockEngine {
    fn open_input(&self, path: &Path) -> Result<Box<dyn Demuxer>, FfmpegError> {
        let media = self.media.get(path).ok_or(FfmpegError::InvalidData)?;
        self.events
            .borrow_mut()
            .push(EngineEvent::OpenInput(path.to_path_buf()));

        Ok(Box::new(MockDemuxer {
            path: path.to_path_buf(),
            media: media.clone(),
            decoders: self.decoders.clone(),
            events: Rc::clone(&self.events),
        }))
    }

    fn format_names(&self) -> Vec<String> {
        self.format_names.clone()
    }

    fn codec_names(&self) -> Vec<String> {
        self.codec_names.clone()
    }
}

struct MockDemuxer {
    path: PathBuf,
    media: MockMedia,
    decoders: Vec<DecoderInfo>,
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl Demuxer for MockDemuxer {
    fn probe(&mut self) -> Result<(), FfmpegError> {
        self.events
            .borrow_mut()
            .push(EngineEvent::Probe(self.path.clone()));
        if self.media.probe_fails {
            return Err(FfmpegError::InvalidData);
        }
        Ok(())
    }

    fn streams(&self) -> Vec<StreamParameters> {
        self.media.streams.clone()
    }

    fn tags(&self) -> Tags {
        self.media.tags.clone()
    }

    fn duration(&self) -> i64 {
        self.media.duration
    }

    fn bit_rate(&self) -> i64 {
        self.media.bit_rate
    }

    fn format_name(&self) -> String {
        self.media.format_name.clone()
    }

    fn find_decoder(&self, codec_id: CodecId) -> Option<DecoderInfo> {
        self.decoders
            .iter()
            .find(|decoder| decoder.id == codec_id)
            .cloned()
    }

    fn open_decoder(&mut self, index: usize, decoder: &DecoderInfo) -> Result<(), FfmpegError> {
        if self.media.broken_decoders.contains(&index) {
            return Err(FfmpegError::InvalidData);
        }
        self.events.borrow_mut().push(EngineEvent::OpenDecoder {
            index,
            name: decoder.name.clone(),
        });
        Ok(())
    }

    fn close_decoder(&mut self, index: usize) {
        self.events
            .borrow_mut()
            .push(EngineEvent::CloseDecoder(index));
    }
}

impl Drop for MockDemuxer {
    fn drop(&mut self) {
        self.events
            .borrow_mut()
            .push(EngineEvent::CloseInput(self.path.clone()));
    }
}
