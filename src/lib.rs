//! # mediascope
//!
//! Inspect media containers: container tags, per-stream codecs, frame rates
//! and aspect ratios, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! `mediascope` never decodes a frame. It opens a container, reads its stream
//! information, and activates a stream's decoder only when a question needs it
//! (the codec name or the frame rate).
//!
//! ## Quick Start
//!
//! ### Container properties
//!
//! ```no_run
//! use mediascope::MediaFile;
//!
//! let file = MediaFile::open("input.mp4")?;
//! println!("format:   {}", file.format_name()?);
//! println!("duration: {:.2}s", file.duration()?);
//! println!("title:    {}", file.title()?.unwrap_or_default());
//! println!("author:   {}", file.author()?.unwrap_or_default());
//! # Ok::<(), mediascope::MediaScopeError>(())
//! ```
//!
//! ### Streams
//!
//! ```no_run
//! use mediascope::{MediaFile, Stream};
//!
//! let file = MediaFile::open("input.mkv")?;
//! for stream in file.streams()? {
//!     match stream {
//!         Stream::Video(video) => println!(
//!             "#{} video {} {}x{} @ {}",
//!             video.index()?,
//!             video.codec_name()?,
//!             video.width()?,
//!             video.height()?,
//!             video.frame_rate()?,
//!         ),
//!         Stream::Audio(audio) => println!(
//!             "#{} audio {} {}Hz {}ch",
//!             audio.index()?,
//!             audio.codec_name()?,
//!             audio.sample_rate()?,
//!             audio.channels()?,
//!         ),
//!     }
//! }
//! # Ok::<(), mediascope::MediaScopeError>(())
//! ```
//!
//! ### One-shot probing
//!
//! ```no_run
//! use mediascope::MediaProbe;
//!
//! for result in MediaProbe::probe_many(&["a.mp4", "b.mkv"]) {
//!     match result {
//!         Ok(report) => print!("{}", report.validate()),
//!         Err(error) => eprintln!("{error}"),
//!     }
//! }
//! ```
//!
//! ## Lifecycle
//!
//! A [`MediaFile`] owns its container. Stream views borrow nothing and can
//! outlive the file, but once the file is closed (explicitly or by drop)
//! every accessor on every view returns [`MediaScopeError::Closed`].
//! A `MediaFile` is single-threaded; open one per thread.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `MediaProbe::probe_many_parallel()` probes files on the rayon pool |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

mod catalog;
mod container;
pub mod engine;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod probe;
pub mod rational;
pub mod registry;
pub mod stream;
pub mod validation;

pub use catalog::StreamCatalog;
pub use container::MediaFile;
pub use engine::MediaKind;
pub use error::{CodecStage, MediaScopeError, OpenStage, Result};
pub use ffmpeg::{FfmpegLogLevel, UnknownLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::Tags;
pub use probe::{MediaProbe, MediaReport, StreamDetails, StreamReport};
pub use rational::Rational;
pub use registry::{codecs, formats};
pub use stream::{AudioStream, Stream, VideoStream, fourcc};
pub use validation::ValidationReport;
