//! Error types for the `mediascope` crate.
//!
//! This module defines [`MediaScopeError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context to tell
//! apart the stage that failed (opening versus probing a container, finding
//! versus opening a decoder) without extra logging at the call site.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

use crate::engine::MediaKind;

/// Convenience alias used throughout the crate.
pub type Result<T, E = MediaScopeError> = std::result::Result<T, E>;

/// The step of [`MediaFile::open`](crate::MediaFile::open) that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenStage {
    /// The engine could not open the input at all.
    CannotOpen,
    /// The input opened but its stream information could not be read.
    CannotReadStreamInfo,
}

impl Display for OpenStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OpenStage::CannotOpen => f.write_str("cannot open"),
            OpenStage::CannotReadStreamInfo => f.write_str("cannot read stream info"),
        }
    }
}

/// The step of codec activation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecStage {
    /// No decoder is registered for the stream's codec id.
    CannotFindCodec,
    /// A decoder exists but could not be opened against the stream.
    CannotOpenCodec,
}

impl Display for CodecStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CodecStage::CannotFindCodec => f.write_str("cannot find codec"),
            CodecStage::CannotOpenCodec => f.write_str("cannot open codec"),
        }
    }
}

/// The unified error type for all `mediascope` operations.
///
/// A tag that is missing from a container is *not* an error: tag accessors
/// return `Ok(None)` for that case.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediaScopeError {
    /// The media file could not be opened or probed.
    #[error("Failed to open media file at {path}: {stage} ({detail})")]
    FileOpen {
        /// Path that was passed to [`crate::MediaFile::open`].
        path: PathBuf,
        /// Which step failed.
        stage: OpenStage,
        /// Message reported by the engine.
        detail: String,
    },

    /// A stream's decoder could not be activated.
    #[error("Codec error on stream {stream_index}: {stage} ({detail})")]
    Codec {
        /// Engine index of the stream.
        stream_index: usize,
        /// Which step failed.
        stage: CodecStage,
        /// Message reported by the engine.
        detail: String,
    },

    /// A raw stream index outside the container's stream list.
    #[error("Stream {index} is out of range (file has {stream_count} streams)")]
    StreamIndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of raw streams in the container.
        stream_count: usize,
    },

    /// The stream exists but is neither video nor audio.
    #[error("Stream {index} is a {kind} stream, only video and audio streams are exposed")]
    UnsupportedStream {
        /// The index that was requested.
        index: usize,
        /// The kind reported by the engine.
        kind: MediaKind,
    },

    /// The container (or the container owning a stream) has been closed.
    #[error("Media file has been closed")]
    Closed,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

impl From<FfmpegError> for MediaScopeError {
    fn from(error: FfmpegError) -> Self {
        MediaScopeError::FfmpegError(error.to_string())
    }
}
