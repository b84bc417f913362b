//! FFmpeg-backed engine.
//!
//! Opening and probing are done as two separate FFI calls so that a failure
//! to read stream info can be told apart from a failure to open the input.
//! Everything else goes through the safe `ffmpeg-next` wrappers.

use std::{
    collections::BTreeMap,
    ffi::{CStr, CString, c_char, c_void},
    path::Path,
    ptr,
};

use ffmpeg_next::{
    Error as FfmpegError,
    codec::{Id as CodecId, context::Context as CodecContext, decoder::Opened},
    format::{context::Input, stream::Stream},
};
use ffmpeg_sys_next as ffi;

use crate::{
    engine::{
        AudioParameters, DecoderInfo, Demuxer, Engine, KindParameters, MediaKind,
        StreamParameters, VideoParameters,
    },
    metadata::Tags,
    rational::Rational,
};

/// The production engine, backed by the system FFmpeg libraries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegEngine;

impl Engine for FfmpegEngine {
    fn open_input(&self, path: &Path) -> Result<Box<dyn Demuxer>, FfmpegError> {
        // Safe to call repeatedly.
        ffmpeg_next::init()?;

        let location =
            CString::new(path.to_string_lossy().as_bytes()).map_err(|_| FfmpegError::InvalidData)?;
        let mut context = ptr::null_mut();

        // avformat_open_input frees the context itself on failure.
        let status = unsafe {
            ffi::avformat_open_input(
                &mut context,
                location.as_ptr(),
                ptr::null(),
                ptr::null_mut(),
            )
        };
        if status != 0 {
            return Err(FfmpegError::from(status));
        }

        let input = unsafe { Input::wrap(context) };
        Ok(Box::new(FfmpegDemuxer {
            decoders: BTreeMap::new(),
            input,
        }))
    }

    fn format_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        unsafe {
            let mut opaque: *mut c_void = ptr::null_mut();
            loop {
                let format = ffi::av_demuxer_iterate(&mut opaque);
                if format.is_null() {
                    break;
                }
                names.push(c_name((*format).name));
            }

            let mut opaque: *mut c_void = ptr::null_mut();
            loop {
                let format = ffi::av_muxer_iterate(&mut opaque);
                if format.is_null() {
                    break;
                }
                names.push(c_name((*format).name));
            }
        }
        names
    }

    fn codec_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        unsafe {
            let mut opaque: *mut c_void = ptr::null_mut();
            loop {
                let codec = ffi::av_codec_iterate(&mut opaque);
                if codec.is_null() {
                    break;
                }
                names.push(c_name((*codec).name));
            }
        }
        names
    }
}

/// An opened FFmpeg input context plus the decoders opened against it.
///
/// Field order matters: decoders drop before the input they were opened on.
struct FfmpegDemuxer {
    decoders: BTreeMap<usize, Opened>,
    input: Input,
}

impl Demuxer for FfmpegDemuxer {
    fn probe(&mut self) -> Result<(), FfmpegError> {
        let status =
            unsafe { ffi::avformat_find_stream_info(self.input.as_mut_ptr(), ptr::null_mut()) };
        if status < 0 {
            Err(FfmpegError::from(status))
        } else {
            Ok(())
        }
    }

    fn streams(&self) -> Vec<StreamParameters> {
        self.input
            .streams()
            .map(|stream| stream_parameters(&stream))
            .collect()
    }

    fn tags(&self) -> Tags {
        self.input.metadata().iter().collect()
    }

    fn duration(&self) -> i64 {
        self.input.duration()
    }

    fn bit_rate(&self) -> i64 {
        self.input.bit_rate()
    }

    fn format_name(&self) -> String {
        self.input.format().name().to_string()
    }

    fn find_decoder(&self, codec_id: CodecId) -> Option<DecoderInfo> {
        ffmpeg_next::codec::decoder::find(codec_id).map(|codec| DecoderInfo {
            id: codec_id,
            name: codec.name().to_string(),
        })
    }

    fn open_decoder(&mut self, index: usize, decoder: &DecoderInfo) -> Result<(), FfmpegError> {
        let stream = self.input.stream(index).ok_or(FfmpegError::StreamNotFound)?;
        let codec =
            ffmpeg_next::codec::decoder::find(decoder.id).ok_or(FfmpegError::DecoderNotFound)?;
        let context = CodecContext::from_parameters(stream.parameters())?;
        let opened = context.decoder().open_as(codec)?;
        self.decoders.insert(index, opened);
        Ok(())
    }

    fn close_decoder(&mut self, index: usize) {
        // Dropping the opened context frees it.
        self.decoders.remove(&index);
    }
}

fn stream_parameters(stream: &Stream<'_>) -> StreamParameters {
    let parameters = stream.parameters();
    let raw = unsafe { &*parameters.as_ptr() };

    let kind = match MediaKind::from(parameters.medium()) {
        MediaKind::Video => KindParameters::Video(VideoParameters {
            width: raw.width.max(0) as u32,
            height: raw.height.max(0) as u32,
            sample_aspect_ratio: Rational::new(
                i64::from(raw.sample_aspect_ratio.num),
                i64::from(raw.sample_aspect_ratio.den),
            ),
        }),
        MediaKind::Audio => KindParameters::Audio(AudioParameters {
            channels: raw.ch_layout.nb_channels.max(0) as u32,
            sample_rate: raw.sample_rate.max(0) as u32,
        }),
        other => KindParameters::Other(other),
    };

    StreamParameters {
        index: stream.index(),
        codec_id: parameters.id(),
        codec_tag: raw.codec_tag,
        bit_rate: raw.bit_rate,
        time_base: stream.time_base().into(),
        real_frame_rate: stream.rate().into(),
        kind,
    }
}

fn c_name(name: *const c_char) -> String {
    if name.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
}
