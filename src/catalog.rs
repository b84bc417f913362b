//! The per-container stream catalog.
//!
//! Built once, on the first call to [`MediaFile::streams`](crate::MediaFile::streams)
//! or any of its siblings, then cached for the life of the file. The catalog
//! keeps the container's native stream order and drops every stream that is
//! neither video nor audio.

use std::{collections::BTreeMap, rc::Rc};

use crate::{
    container::Container,
    engine::{MediaKind, StreamParameters},
    error::{MediaScopeError, Result},
    stream::Stream,
};

/// Ordered video and audio streams of one container.
#[derive(Debug)]
pub struct StreamCatalog {
    streams: Vec<Stream>,
    /// Kind of every raw stream, keyed by engine index.
    kinds: BTreeMap<usize, MediaKind>,
    stream_count: usize,
}

impl StreamCatalog {
    pub(crate) fn build(container: &Rc<Container>, raw_streams: Vec<StreamParameters>) -> Self {
        let mut streams = Vec::with_capacity(raw_streams.len());
        let mut kinds = BTreeMap::new();

        for parameters in &raw_streams {
            kinds.insert(parameters.index, parameters.media_kind());
            match Stream::from_parameters(container, parameters) {
                Some(stream) => streams.push(stream),
                None => log::trace!(
                    "Skipping {} stream {}",
                    parameters.media_kind(),
                    parameters.index
                ),
            }
        }

        log::debug!(
            "Built stream catalog: {} of {} streams exposed",
            streams.len(),
            raw_streams.len()
        );

        Self {
            streams,
            kinds,
            stream_count: raw_streams.len(),
        }
    }

    /// Exposed streams in container order.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Number of exposed (video and audio) streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// `true` when the container has no video or audio stream.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Number of raw streams in the container, including skipped kinds.
    pub fn stream_count(&self) -> usize {
        self.stream_count
    }

    /// Streams of one kind, in container order.
    pub fn by_kind(&self, kind: MediaKind) -> Vec<&Stream> {
        self.streams
            .iter()
            .filter(|stream| stream.media_kind() == kind)
            .collect()
    }

    /// Look up a stream by engine index.
    ///
    /// # Errors
    ///
    /// [`MediaScopeError::StreamIndexOutOfRange`] if no raw stream carries
    /// `index`, [`MediaScopeError::UnsupportedStream`] if it is neither video
    /// nor audio.
    pub fn get(&self, index: usize) -> Result<&Stream> {
        let kind = *self
            .kinds
            .get(&index)
            .ok_or(MediaScopeError::StreamIndexOutOfRange {
                index,
                stream_count: self.stream_count,
            })?;

        self.streams
            .iter()
            .find(|stream| stream.engine_index() == index)
            .ok_or(MediaScopeError::UnsupportedStream { index, kind })
    }
}
