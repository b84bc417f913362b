//! Structural checks over a probed media file.
//!
//! [`MediaFile::validate`](crate::MediaFile::validate) and
//! [`MediaReport::validate`] inspect every exposed stream and sort what they
//! find into informational notices, warnings and errors.
//!
//! # Example
//!
//! ```no_run
//! use mediascope::MediaFile;
//!
//! let file = MediaFile::open("input.mp4")?;
//! let report = file.validate()?;
//! if !report.is_valid() {
//!     eprint!("{report}");
//! }
//! # Ok::<(), mediascope::MediaScopeError>(())
//! ```

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};

use crate::{
    probe::{MediaReport, StreamDetails},
    rational::Rational,
};

/// Frame rates above this many frames per second are flagged.
const MAX_PLAUSIBLE_FRAME_RATE: i64 = 240;

/// Findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Notices that are not problems.
    pub info: Vec<String>,
    /// Suspicious values that do not make the file unusable.
    pub warnings: Vec<String>,
    /// Values no player could work with.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// `true` if there are no errors. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Warnings plus errors.
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

pub(crate) fn validate_report(media: &MediaReport) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Stream presence ────────────────────────────────────────────
    if media.streams.is_empty() {
        report
            .errors
            .push("File contains neither video nor audio streams".to_string());
    }
    if media.video_streams().next().is_none() {
        report.info.push("No video stream found".to_string());
    }
    if media.audio_streams().next().is_none() {
        report.info.push("No audio stream found".to_string());
    }

    let excluded = media.stream_count.saturating_sub(media.streams.len());
    if excluded > 0 {
        report.info.push(format!(
            "{excluded} stream(s) of other kinds are not inspected"
        ));
    }

    // ── Duration ───────────────────────────────────────────────────
    if media.duration_seconds < 0.0 {
        report
            .warnings
            .push("Container does not report a duration".to_string());
    } else if media.duration_seconds == 0.0 {
        report.warnings.push("Media duration is zero".to_string());
    }

    // ── Per stream ─────────────────────────────────────────────────
    for stream in &media.streams {
        let codec = stream.codec.as_deref().unwrap_or("unknown codec");
        match &stream.details {
            StreamDetails::Video {
                width,
                height,
                frame_rate,
                ..
            } => {
                if *width == 0 || *height == 0 {
                    report.errors.push(format!(
                        "Stream {}: invalid video dimensions {width}x{height}",
                        stream.index
                    ));
                }
                check_frame_rate(&mut report, stream.index, *frame_rate);

                let rate = frame_rate.map_or_else(|| "?".to_string(), |rate| rate.to_string());
                report.info.push(format!(
                    "Video: stream {} {codec} {width}x{height} @ {rate}",
                    stream.index
                ));
            }
            StreamDetails::Audio {
                channels,
                sample_rate,
            } => {
                if *sample_rate == 0 {
                    report.errors.push(format!(
                        "Stream {}: audio sample rate is zero",
                        stream.index
                    ));
                }
                if *channels == 0 {
                    report.errors.push(format!(
                        "Stream {}: audio channel count is zero",
                        stream.index
                    ));
                }

                report.info.push(format!(
                    "Audio: stream {} {codec} {sample_rate}Hz {channels}ch",
                    stream.index
                ));
            }
        }
    }

    report
}

fn check_frame_rate(report: &mut ValidationReport, index: usize, frame_rate: Option<Rational>) {
    let Some(rate) = frame_rate else {
        report.warnings.push(format!(
            "Stream {index}: frame rate unavailable, decoder could not be activated"
        ));
        return;
    };

    match rate.value_cmp(Rational::new(0, 1)) {
        None => report
            .warnings
            .push(format!("Stream {index}: frame rate is undefined ({rate})")),
        Some(Ordering::Less | Ordering::Equal) => report
            .warnings
            .push(format!("Stream {index}: frame rate is not positive ({rate})")),
        Some(Ordering::Greater) => {
            if rate.value_cmp(Rational::new(MAX_PLAUSIBLE_FRAME_RATE, 1))
                == Some(Ordering::Greater)
            {
                report.warnings.push(format!(
                    "Stream {index}: unusually high frame rate ({:.1} fps)",
                    rate.to_f64()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{metadata::Tags, probe::StreamReport};

    fn video(index: usize, width: u32, height: u32, frame_rate: Option<Rational>) -> StreamReport {
        StreamReport {
            index,
            codec: Some("h264".to_string()),
            fourcc: "avc1".to_string(),
            bit_rate: 0,
            details: StreamDetails::Video {
                width,
                height,
                frame_aspect_ratio: None,
                sample_aspect_ratio: Rational::ONE,
                real_aspect_ratio: None,
                frame_rate,
            },
        }
    }

    fn audio(index: usize, channels: u32, sample_rate: u32) -> StreamReport {
        StreamReport {
            index,
            codec: Some("aac".to_string()),
            fourcc: "mp4a".to_string(),
            bit_rate: 0,
            details: StreamDetails::Audio {
                channels,
                sample_rate,
            },
        }
    }

    fn media(streams: Vec<StreamReport>, stream_count: usize) -> MediaReport {
        MediaReport {
            path: PathBuf::from("test.mp4"),
            format: "mp4".to_string(),
            duration_seconds: 10.0,
            bit_rate: 0,
            tags: Tags::new(),
            streams,
            stream_count,
        }
    }

    #[test]
    fn healthy_file_is_valid() {
        let report = validate_report(&media(
            vec![
                video(0, 1920, 1080, Some(Rational::new(30, 1))),
                audio(1, 2, 48000),
            ],
            2,
        ));

        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
        assert!(report.info.iter().any(|line| line.starts_with("Video:")));
        assert!(report.info.iter().any(|line| line.starts_with("Audio:")));
    }

    #[test]
    fn no_streams_is_an_error() {
        let report = validate_report(&media(Vec::new(), 1));

        assert!(!report.is_valid());
        assert_eq!(report.info.len(), 3);
    }

    #[test]
    fn zero_dimensions_and_empty_audio() {
        let report = validate_report(&media(
            vec![video(0, 0, 720, Some(Rational::new(25, 1))), audio(1, 0, 0)],
            2,
        ));

        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn frame_rate_warnings() {
        let report = validate_report(&media(
            vec![
                video(0, 640, 480, None),
                video(1, 640, 480, Some(Rational::UNDEFINED)),
                video(2, 640, 480, Some(Rational::new(1000, 1))),
                video(3, 640, 480, Some(Rational::new(0, 1))),
            ],
            4,
        ));

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 4);
    }

    #[test]
    fn unknown_duration_warns() {
        let mut file = media(vec![audio(0, 2, 44100)], 1);
        file.duration_seconds = -9.2e12;

        let report = validate_report(&file);
        assert_eq!(report.warnings, ["Container does not report a duration"]);
    }

    #[test]
    fn display_lists_every_section() {
        let report = ValidationReport {
            info: vec!["a".into()],
            warnings: vec!["b".into()],
            errors: vec!["c".into()],
        };
        assert_eq!(report.to_string(), "[INFO] a\n[WARN] b\n[ERROR] c\n");
        assert_eq!(ValidationReport::default().to_string(), "No issues found.\n");
    }
}
