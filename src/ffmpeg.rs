//! Control over FFmpeg's own console logging.
//!
//! FFmpeg writes its diagnostics straight to stderr, independently of the
//! [`log`](https://crates.io/crates/log) facade this crate reports through.
//! Probing damaged or exotic files can make it chatty, so callers get a way to
//! turn it down without depending on `ffmpeg-next` themselves.
//!
//! ```no_run
//! use mediascope::FfmpegLogLevel;
//!
//! mediascope::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! assert_eq!(mediascope::get_ffmpeg_log_level(), Some(FfmpegLogLevel::Error));
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use ffmpeg_next::util::log::{self as av_log, Level};

/// FFmpeg log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    Quiet,
    Panic,
    Fatal,
    Error,
    /// FFmpeg's default.
    Warning,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl FfmpegLogLevel {
    /// Every level, quietest first.
    pub const ALL: [FfmpegLogLevel; 9] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Panic,
        FfmpegLogLevel::Fatal,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Verbose,
        FfmpegLogLevel::Debug,
        FfmpegLogLevel::Trace,
    ];

    /// Lowercase name accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Panic => "panic",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Verbose => "verbose",
            FfmpegLogLevel::Debug => "debug",
            FfmpegLogLevel::Trace => "trace",
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Parsing failure for [`FfmpegLogLevel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown FFmpeg log level `{0}`")]
pub struct UnknownLogLevel(pub String);

impl FromStr for FfmpegLogLevel {
    type Err = UnknownLogLevel;

    /// Case-insensitive; `warn` is accepted for `warning`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        if lowered == "warn" {
            return Ok(FfmpegLogLevel::Warning);
        }
        FfmpegLogLevel::ALL
            .into_iter()
            .find(|level| level.name() == lowered)
            .ok_or_else(|| UnknownLogLevel(value.to_string()))
    }
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl From<Level> for FfmpegLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

/// Set FFmpeg's console verbosity. Rust-side `log` output is unaffected.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    log::debug!("Setting FFmpeg log level to {level}");
    av_log::set_level(level.into());
}

/// Current FFmpeg console verbosity, or `None` if FFmpeg reports a value
/// outside the known levels.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    av_log::get_level().ok().map(FfmpegLogLevel::from)
}
