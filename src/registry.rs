//! Engine-wide format and codec names.
//!
//! These are plain queries against the engine's registry; nothing is cached.
//!
//! ```no_run
//! let formats = mediascope::formats();
//! assert!(formats.iter().any(|name| name == "wav"));
//! ```

use crate::engine::{Engine, libav::FfmpegEngine};

/// Every input and output format FFmpeg supports, sorted and de-duplicated.
pub fn formats() -> Vec<String> {
    formats_with(&FfmpegEngine)
}

/// Every codec FFmpeg supports, sorted and de-duplicated.
pub fn codecs() -> Vec<String> {
    codecs_with(&FfmpegEngine)
}

/// [`formats`] against an arbitrary engine.
pub fn formats_with<E: Engine + ?Sized>(engine: &E) -> Vec<String> {
    sorted_unique(engine.format_names())
}

/// [`codecs`] against an arbitrary engine.
pub fn codecs_with<E: Engine + ?Sized>(engine: &E) -> Vec<String> {
    sorted_unique(engine.codec_names())
}

fn sorted_unique(mut names: Vec<String>) -> Vec<String> {
    names.sort_unstable();
    names.dedup();
    names
}
