//! Typed views over a container's elementary streams.
//!
//! A [`Stream`] is either a [`VideoStream`] or an [`AudioStream`]; the kind is
//! decided once, when the catalog is built. Views are cheap to clone and hold
//! only a weak reference to their container, so every accessor first checks
//! that the container is still open and returns
//! [`MediaScopeError::Closed`](crate::MediaScopeError::Closed) otherwise.
//!
//! Most properties are read straight from the codec parameters captured when
//! the catalog was built. [`codec_name`](Stream::codec_name) and
//! [`VideoStream::frame_rate`] additionally activate the stream's decoder the
//! first time they are called.

use std::rc::{Rc, Weak};

use ffmpeg_next::codec::Id as CodecId;

use crate::{
    container::Container,
    engine::{KindParameters, MediaKind, StreamParameters},
    error::{MediaScopeError, Result},
    rational::Rational,
};

/// Decode a packed codec tag into its FourCC string.
///
/// Byte `j` of the result is `(tag >> 8 * j) & 0xFF`. Trailing zero bytes
/// are dropped; zero bytes below the highest non-zero byte are kept. Each
/// byte becomes the `char` with the same code point.
///
/// # Example
///
/// ```
/// use mediascope::fourcc;
///
/// assert_eq!(fourcc(0x3163_7661), "avc1");
/// assert_eq!(fourcc(0x0076_6468), "hdv");
/// assert_eq!(fourcc(0), "");
/// ```
pub fn fourcc(tag: u32) -> String {
    let bytes = tag.to_le_bytes();
    let length = bytes
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |position| position + 1);
    bytes[..length].iter().copied().map(char::from).collect()
}

/// Properties shared by every stream kind.
#[derive(Debug, Clone)]
struct StreamCore {
    container: Weak<Container>,
    index: usize,
    codec_id: CodecId,
    codec_tag: u32,
    bit_rate: i64,
    time_base: Rational,
    real_frame_rate: Rational,
}

impl StreamCore {
    fn live(&self) -> Result<Rc<Container>> {
        let container = self.container.upgrade().ok_or(MediaScopeError::Closed)?;
        container.ensure_open()?;
        Ok(container)
    }

    fn check(&self) -> Result<()> {
        self.live().map(|_| ())
    }

    fn index(&self) -> Result<usize> {
        self.check()?;
        Ok(self.index)
    }

    fn codec_id(&self) -> Result<CodecId> {
        self.check()?;
        Ok(self.codec_id)
    }

    fn codec_name(&self) -> Result<String> {
        self.live()?.activate_codec(self.index, self.codec_id)
    }

    fn is_codec_active(&self) -> Result<bool> {
        self.live()?.is_codec_active(self.index)
    }

    fn fourcc_tag(&self) -> Result<String> {
        self.check()?;
        Ok(fourcc(self.codec_tag))
    }

    fn bit_rate(&self) -> Result<i64> {
        self.check()?;
        Ok(self.bit_rate)
    }

    fn time_base(&self) -> Result<Rational> {
        self.check()?;
        Ok(self.time_base)
    }
}

/// A video or audio stream.
#[derive(Debug, Clone)]
pub enum Stream {
    /// A video stream.
    Video(VideoStream),
    /// An audio stream.
    Audio(AudioStream),
}

impl Stream {
    /// Build the view for a raw stream. Returns `None` for kinds other than
    /// video and audio.
    pub(crate) fn from_parameters(
        container: &Rc<Container>,
        parameters: &StreamParameters,
    ) -> Option<Self> {
        let core = StreamCore {
            container: Rc::downgrade(container),
            index: parameters.index,
            codec_id: parameters.codec_id,
            codec_tag: parameters.codec_tag,
            bit_rate: parameters.bit_rate,
            time_base: parameters.time_base,
            real_frame_rate: parameters.real_frame_rate,
        };

        match parameters.kind {
            KindParameters::Video(video) => Some(Stream::Video(VideoStream {
                core,
                width: video.width,
                height: video.height,
                sample_aspect_ratio: video.sample_aspect_ratio,
            })),
            KindParameters::Audio(audio) => Some(Stream::Audio(AudioStream {
                core,
                channels: audio.channels,
                sample_rate: audio.sample_rate,
            })),
            KindParameters::Other(_) => None,
        }
    }

    fn core(&self) -> &StreamCore {
        match self {
            Stream::Video(video) => &video.core,
            Stream::Audio(audio) => &audio.core,
        }
    }

    /// Engine index without the open check. Catalog lookups and probe
    /// reports run while the file is known to be open.
    pub(crate) fn engine_index(&self) -> usize {
        self.core().index
    }

    pub(crate) fn media_kind(&self) -> MediaKind {
        match self {
            Stream::Video(_) => MediaKind::Video,
            Stream::Audio(_) => MediaKind::Audio,
        }
    }

    /// Whether this is a video or an audio stream.
    pub fn kind(&self) -> Result<MediaKind> {
        self.core().check()?;
        Ok(self.media_kind())
    }

    /// Engine index of the stream within its container.
    pub fn index(&self) -> Result<usize> {
        self.core().index()
    }

    /// FFmpeg codec identifier from the stream parameters.
    pub fn codec_id(&self) -> Result<CodecId> {
        self.core().codec_id()
    }

    /// The video view, if this is a video stream.
    pub fn as_video(&self) -> Option<&VideoStream> {
        match self {
            Stream::Video(video) => Some(video),
            Stream::Audio(_) => None,
        }
    }

    /// The audio view, if this is an audio stream.
    pub fn as_audio(&self) -> Option<&AudioStream> {
        match self {
            Stream::Audio(audio) => Some(audio),
            Stream::Video(_) => None,
        }
    }

    /// Declared name of the stream's decoder. Activates the decoder on first
    /// use.
    ///
    /// # Errors
    ///
    /// [`MediaScopeError::Codec`] if no decoder exists for the codec or it
    /// cannot be opened.
    pub fn codec_name(&self) -> Result<String> {
        self.core().codec_name()
    }

    /// Whether the decoder has been activated.
    pub fn is_codec_active(&self) -> Result<bool> {
        self.core().is_codec_active()
    }

    /// The codec tag as a FourCC string (see [`fourcc`]).
    pub fn fourcc_tag(&self) -> Result<String> {
        self.core().fourcc_tag()
    }

    /// Stream bit rate in bits per second (0 when unknown).
    pub fn bit_rate(&self) -> Result<i64> {
        self.core().bit_rate()
    }

    /// Time base of the stream's timestamps.
    pub fn time_base(&self) -> Result<Rational> {
        self.core().time_base()
    }
}

/// A video stream.
#[derive(Debug, Clone)]
pub struct VideoStream {
    core: StreamCore,
    width: u32,
    height: u32,
    sample_aspect_ratio: Rational,
}

impl VideoStream {
    /// See [`Stream::index`].
    pub fn index(&self) -> Result<usize> {
        self.core.index()
    }

    /// See [`Stream::codec_id`].
    pub fn codec_id(&self) -> Result<CodecId> {
        self.core.codec_id()
    }

    /// See [`Stream::codec_name`].
    pub fn codec_name(&self) -> Result<String> {
        self.core.codec_name()
    }

    /// See [`Stream::is_codec_active`].
    pub fn is_codec_active(&self) -> Result<bool> {
        self.core.is_codec_active()
    }

    /// See [`Stream::fourcc_tag`].
    pub fn fourcc_tag(&self) -> Result<String> {
        self.core.fourcc_tag()
    }

    /// Stream bit rate in bits per second (0 when unknown).
    pub fn bit_rate(&self) -> Result<i64> {
        self.core.bit_rate()
    }

    /// See [`Stream::time_base`].
    pub fn time_base(&self) -> Result<Rational> {
        self.core.time_base()
    }

    /// Frame width in pixels.
    pub fn width(&self) -> Result<u32> {
        self.core.check()?;
        Ok(self.width)
    }

    /// Frame height in pixels.
    pub fn height(&self) -> Result<u32> {
        self.core.check()?;
        Ok(self.height)
    }

    /// `width / height`, or `None` if either dimension is zero.
    pub fn frame_aspect_ratio(&self) -> Result<Option<Rational>> {
        self.core.check()?;
        Ok(self.frame_ratio())
    }

    /// Pixel aspect ratio. Square pixels (`1/1`) unless the stored ratio has
    /// both parts non-zero.
    pub fn sample_aspect_ratio(&self) -> Result<Rational> {
        self.core.check()?;
        Ok(self.sample_ratio())
    }

    /// Display aspect ratio: frame ratio times sample ratio, unreduced.
    /// `None` whenever the frame ratio is.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediascope::{MediaFile, Rational};
    ///
    /// let file = MediaFile::open("dvd.vob")?;
    /// let video = file.video_streams()?[0];
    /// // 720x480 with 8:9 pixels
    /// assert_eq!(video.real_aspect_ratio()?.map(Rational::reduced), Some(Rational::new(4, 3)));
    /// # Ok::<(), mediascope::MediaScopeError>(())
    /// ```
    pub fn real_aspect_ratio(&self) -> Result<Option<Rational>> {
        self.core.check()?;
        Ok(self.frame_ratio().map(|frame| frame * self.sample_ratio()))
    }

    /// Frame rate. Activates the decoder on first use.
    ///
    /// Prefers the container-reported real frame rate when both of its parts
    /// are non-zero, otherwise inverts the stream time base. A time base with
    /// a zero numerator inverts to a rational with a zero denominator.
    pub fn frame_rate(&self) -> Result<Rational> {
        self.core.codec_name()?;

        let real = self.core.real_frame_rate;
        if real.is_nonzero() {
            Ok(real)
        } else {
            Ok(self.core.time_base.invert())
        }
    }

    fn frame_ratio(&self) -> Option<Rational> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(Rational::new(
            i64::from(self.width),
            i64::from(self.height),
        ))
    }

    fn sample_ratio(&self) -> Rational {
        if self.sample_aspect_ratio.is_nonzero() {
            self.sample_aspect_ratio
        } else {
            Rational::ONE
        }
    }
}

/// An audio stream.
#[derive(Debug, Clone)]
pub struct AudioStream {
    core: StreamCore,
    channels: u32,
    sample_rate: u32,
}

impl AudioStream {
    /// See [`Stream::index`].
    pub fn index(&self) -> Result<usize> {
        self.core.index()
    }

    /// See [`Stream::codec_id`].
    pub fn codec_id(&self) -> Result<CodecId> {
        self.core.codec_id()
    }

    /// See [`Stream::codec_name`].
    pub fn codec_name(&self) -> Result<String> {
        self.core.codec_name()
    }

    /// See [`Stream::is_codec_active`].
    pub fn is_codec_active(&self) -> Result<bool> {
        self.core.is_codec_active()
    }

    /// See [`Stream::fourcc_tag`].
    pub fn fourcc_tag(&self) -> Result<String> {
        self.core.fourcc_tag()
    }

    /// Stream bit rate in bits per second (0 when unknown).
    pub fn bit_rate(&self) -> Result<i64> {
        self.core.bit_rate()
    }

    /// See [`Stream::time_base`].
    pub fn time_base(&self) -> Result<Rational> {
        self.core.time_base()
    }

    /// Number of audio channels.
    pub fn channels(&self) -> Result<u32> {
        self.core.check()?;
        Ok(self.channels)
    }

    /// Sample rate in hertz.
    pub fn sample_rate(&self) -> Result<u32> {
        self.core.check()?;
        Ok(self.sample_rate)
    }
}
