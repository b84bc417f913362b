//! Core [`MediaFile`] implementation.
//!
//! `MediaFile` is the main entry point for the crate. It owns the engine's
//! opened container, answers container-level questions (tags, duration, bit
//! rate, format), and hands out typed [`Stream`] views.
//!
//! The container lives in a shared cell. The `MediaFile` holds the only strong
//! reference to it; every stream view holds a weak one. Closing the file (or
//! dropping it) releases every activated decoder and then the container, and
//! from then on every accessor, on the file or on any view, returns
//! [`MediaScopeError::Closed`].

use std::{
    cell::{OnceCell, RefCell},
    collections::BTreeMap,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    rc::Rc,
};

use ffmpeg_next::codec::Id as CodecId;
use ffmpeg_sys_next::AV_TIME_BASE;

use crate::{
    catalog::StreamCatalog,
    engine::{DecoderInfo, Demuxer, Engine, MediaKind, libav::FfmpegEngine},
    error::{CodecStage, MediaScopeError, OpenStage, Result},
    metadata::{self, Tags},
    stream::{AudioStream, Stream, VideoStream},
    validation::ValidationReport,
};

/// Ticks per second of the container duration counter.
const TICKS_PER_SECOND: f64 = AV_TIME_BASE as f64;

/// An opened media container.
///
/// # Example
///
/// ```no_run
/// use mediascope::{MediaFile, MediaScopeError};
///
/// let file = MediaFile::open("input.mp4")?;
/// println!("{} ({:.2}s)", file.format_name()?, file.duration()?);
/// println!("title: {:?}", file.title()?);
///
/// for video in file.video_streams()? {
///     println!(
///         "video #{}: {} {}x{} @ {}",
///         video.index()?,
///         video.codec_name()?,
///         video.width()?,
///         video.height()?,
///         video.frame_rate()?,
///     );
/// }
/// # Ok::<(), MediaScopeError>(())
/// ```
pub struct MediaFile {
    container: Rc<Container>,
    catalog: OnceCell<StreamCatalog>,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("path", &self.container.path)
            .field("open", &self.is_open())
            .field("catalog", &self.catalog.get())
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a media file with the FFmpeg engine.
    ///
    /// # Errors
    ///
    /// Returns [`MediaScopeError::FileOpen`] with
    /// [`OpenStage::CannotOpen`] if the input cannot be opened, or
    /// [`OpenStage::CannotReadStreamInfo`] if its stream information cannot
    /// be read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediascope::{MediaFile, MediaScopeError};
    ///
    /// let file = MediaFile::open("video.mkv")?;
    /// # Ok::<(), MediaScopeError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(&FfmpegEngine, path)
    }

    /// Open a media file with an arbitrary [`Engine`].
    ///
    /// A container whose stream info cannot be read is released before the
    /// error is returned.
    pub fn open_with<E, P>(engine: &E, path: P) -> Result<Self>
    where
        E: Engine + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening media file: {}", path.display());

        let mut demuxer = engine
            .open_input(&path)
            .map_err(|error| MediaScopeError::FileOpen {
                path: path.clone(),
                stage: OpenStage::CannotOpen,
                detail: error.to_string(),
            })?;

        if let Err(error) = demuxer.probe() {
            log::debug!(
                "Stream info probe failed for {}, releasing container",
                path.display()
            );
            drop(demuxer);
            return Err(MediaScopeError::FileOpen {
                path,
                stage: OpenStage::CannotReadStreamInfo,
                detail: error.to_string(),
            });
        }

        log::info!(
            "Opened media file: {} (format={}, streams={})",
            path.display(),
            demuxer.format_name(),
            demuxer.streams().len(),
        );

        Ok(Self {
            container: Rc::new(Container {
                path,
                state: RefCell::new(ContainerState::Open(OpenContainer {
                    demuxer,
                    decoders: BTreeMap::new(),
                })),
            }),
            catalog: OnceCell::new(),
        })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.container.path
    }

    /// `false` once [`close`](MediaFile::close) has run.
    pub fn is_open(&self) -> bool {
        self.container.ensure_open().is_ok()
    }

    /// Look up a container tag by exact name.
    ///
    /// Returns `Ok(None)` if the tag is absent.
    pub fn metadata(&self, tag: &str) -> Result<Option<String>> {
        self.resolve(&[tag])
    }

    /// Snapshot of every container tag, in engine order.
    pub fn tags(&self) -> Result<Tags> {
        self.container.with_open(|open| Ok(open.demuxer.tags()))
    }

    /// The `title` tag.
    pub fn title(&self) -> Result<Option<String>> {
        self.resolve(metadata::TITLE)
    }

    /// `author`, falling back to `artist`.
    pub fn author(&self) -> Result<Option<String>> {
        self.resolve(metadata::AUTHOR)
    }

    /// The `copyright` tag.
    pub fn copyright(&self) -> Result<Option<String>> {
        self.resolve(metadata::COPYRIGHT)
    }

    /// The `comment` tag.
    pub fn comment(&self) -> Result<Option<String>> {
        self.resolve(metadata::COMMENT)
    }

    /// The `album` tag.
    pub fn album(&self) -> Result<Option<String>> {
        self.resolve(metadata::ALBUM)
    }

    /// The `genre` tag.
    pub fn genre(&self) -> Result<Option<String>> {
        self.resolve(metadata::GENRE)
    }

    /// `year`, falling back to `date`.
    pub fn year(&self) -> Result<Option<String>> {
        self.resolve(metadata::YEAR)
    }

    /// The `track` tag as stored, e.g. `"3/12"`.
    pub fn track(&self) -> Result<Option<String>> {
        self.resolve(metadata::TRACK)
    }

    /// The leading four-digit year of [`year`](MediaFile::year), if any.
    pub fn year_number(&self) -> Result<Option<i32>> {
        Ok(self.year()?.as_deref().and_then(metadata::parse_year))
    }

    /// The leading integer of [`track`](MediaFile::track) (`"3/12"` is 3).
    pub fn track_number(&self) -> Result<Option<u32>> {
        Ok(self.track()?.as_deref().and_then(metadata::parse_track_number))
    }

    /// Container duration in seconds.
    ///
    /// The raw counter is divided by `AV_TIME_BASE` as-is. Containers that
    /// do not know their duration report a negative sentinel, which comes
    /// through as a large negative number of seconds.
    pub fn duration(&self) -> Result<f64> {
        let ticks = self.duration_micros()?;
        if ticks < 0 {
            log::warn!(
                "{} reports no duration (raw value {ticks}), passing it through",
                self.container.path.display()
            );
        }
        Ok(ticks as f64 / TICKS_PER_SECOND)
    }

    /// The raw duration counter, in `AV_TIME_BASE` units.
    pub fn duration_micros(&self) -> Result<i64> {
        self.container.with_open(|open| Ok(open.demuxer.duration()))
    }

    /// Container bit rate in bits per second (0 when unknown).
    pub fn bit_rate(&self) -> Result<i64> {
        self.container.with_open(|open| Ok(open.demuxer.bit_rate()))
    }

    /// Short name of the demuxer (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub fn format_name(&self) -> Result<String> {
        self.container.with_open(|open| Ok(open.demuxer.format_name()))
    }

    /// The stream catalog, built on first access.
    pub fn catalog(&self) -> Result<&StreamCatalog> {
        self.container.ensure_open()?;
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }

        let raw_streams = self.container.with_open(|open| Ok(open.demuxer.streams()))?;
        let catalog = StreamCatalog::build(&self.container, raw_streams);
        Ok(self.catalog.get_or_init(|| catalog))
    }

    /// Every video and audio stream, in container order.
    ///
    /// Subtitle, data and attachment streams are not represented.
    pub fn streams(&self) -> Result<&[Stream]> {
        Ok(self.catalog()?.streams())
    }

    /// Video streams, in container order.
    pub fn video_streams(&self) -> Result<Vec<&VideoStream>> {
        Ok(self
            .catalog()?
            .streams()
            .iter()
            .filter_map(Stream::as_video)
            .collect())
    }

    /// Audio streams, in container order.
    pub fn audio_streams(&self) -> Result<Vec<&AudioStream>> {
        Ok(self
            .catalog()?
            .streams()
            .iter()
            .filter_map(Stream::as_audio)
            .collect())
    }

    /// Streams of one kind. Empty for kinds other than video and audio.
    pub fn streams_of_kind(&self, kind: MediaKind) -> Result<Vec<&Stream>> {
        Ok(self.catalog()?.by_kind(kind))
    }

    /// Look up a stream by its raw engine index.
    ///
    /// # Errors
    ///
    /// - [`MediaScopeError::StreamIndexOutOfRange`] if `index` is past the
    ///   container's stream list.
    /// - [`MediaScopeError::UnsupportedStream`] if the stream is neither
    ///   video nor audio.
    pub fn stream(&self, index: usize) -> Result<&Stream> {
        self.catalog()?.get(index)
    }

    /// Snapshot every property and check it for problems.
    pub fn validate(&self) -> Result<ValidationReport> {
        Ok(crate::probe::MediaReport::from_file(self)?.validate())
    }

    /// Release every activated decoder, then the container.
    ///
    /// Calling `close` again is a no-op. Dropping the file has the same
    /// effect.
    pub fn close(&mut self) {
        self.catalog.take();
        self.container.close();
    }

    fn resolve(&self, names: &[&str]) -> Result<Option<String>> {
        self.container.with_open(|open| {
            let tags = open.demuxer.tags();
            Ok(metadata::resolve_first(&tags, names).map(str::to_owned))
        })
    }
}

impl Drop for MediaFile {
    fn drop(&mut self) {
        self.close();
    }
}

/// Shared container cell. Stream views reach it through a `Weak`.
pub(crate) struct Container {
    path: PathBuf,
    state: RefCell<ContainerState>,
}

enum ContainerState {
    Open(OpenContainer),
    Closed,
}

struct OpenContainer {
    demuxer: Box<dyn Demuxer>,
    /// Activated decoders by stream index. An entry never changes once set.
    decoders: BTreeMap<usize, DecoderInfo>,
}

impl Container {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        match &*self.state.borrow() {
            ContainerState::Open(_) => Ok(()),
            ContainerState::Closed => Err(MediaScopeError::Closed),
        }
    }

    fn with_open<T>(&self, action: impl FnOnce(&mut OpenContainer) -> Result<T>) -> Result<T> {
        match &mut *self.state.borrow_mut() {
            ContainerState::Open(open) => action(open),
            ContainerState::Closed => Err(MediaScopeError::Closed),
        }
    }

    /// Find and open the decoder for stream `index`, once.
    ///
    /// Returns the decoder's declared name.
    pub(crate) fn activate_codec(&self, index: usize, codec_id: CodecId) -> Result<String> {
        self.with_open(|open| {
            if let Some(decoder) = open.decoders.get(&index) {
                return Ok(decoder.name.clone());
            }

            let decoder =
                open.demuxer
                    .find_decoder(codec_id)
                    .ok_or_else(|| MediaScopeError::Codec {
                        stream_index: index,
                        stage: CodecStage::CannotFindCodec,
                        detail: format!("no decoder registered for {codec_id:?}"),
                    })?;

            open.demuxer
                .open_decoder(index, &decoder)
                .map_err(|error| MediaScopeError::Codec {
                    stream_index: index,
                    stage: CodecStage::CannotOpenCodec,
                    detail: error.to_string(),
                })?;

            log::debug!("Activated decoder {} for stream {index}", decoder.name);

            let name = decoder.name.clone();
            open.decoders.insert(index, decoder);
            Ok(name)
        })
    }

    pub(crate) fn is_codec_active(&self, index: usize) -> Result<bool> {
        self.with_open(|open| Ok(open.decoders.contains_key(&index)))
    }

    fn close(&self) {
        let state = self.state.replace(ContainerState::Closed);
        let ContainerState::Open(mut open) = state else {
            return;
        };

        for index in open.decoders.keys() {
            open.demuxer.close_decoder(*index);
        }
        drop(open.demuxer);

        log::debug!(
            "Closed media file: {} ({} decoders released)",
            self.path.display(),
            open.decoders.len(),
        );
    }
}
