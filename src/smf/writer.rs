//! SMF chunk writers
//!
//! `TrackWriter` owns one `MTrk` chunk from the placeholder header to the
//! patched length; `SmfWriter` owns the final file buffer.

use super::header::{FileType, HeaderChunk, HEADER_SIZE};
use super::message::{meta, status};
use super::vlq;
use crate::error::{Error, Result};

/// Track chunk magic
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Track chunk header size (magic + length)
pub const TRACK_HEADER_SIZE: usize = 8;

/// Offset of the big-endian length field inside a track chunk
const LENGTH_OFFSET: usize = 4;

/// End of track meta event, including its zero delta
pub const END_OF_TRACK: [u8; 4] = [0x00, status::META, meta::END_OF_TRACK, 0x00];

/// Track chunk writer
///
/// Creating a writer emits the chunk header with a zero length; events are
/// appended in order and `finalize` closes the chunk.
#[derive(Debug)]
pub struct TrackWriter {
    data: Vec<u8>,
}

impl TrackWriter {
    /// Create a track writer with the chunk header already written
    pub fn new() -> Self {
        let mut data = Vec::with_capacity(64);
        data.extend_from_slice(TRACK_MAGIC);
        // Length is unknown until the track is finalized
        data.extend_from_slice(&0u32.to_be_bytes());
        Self { data }
    }

    /// Write one event: a delta time followed by its status and data bytes
    ///
    /// The delta is checked before anything is appended.
    pub fn write_event(&mut self, delta: u32, bytes: &[u8]) -> Result<()> {
        vlq::write(&mut self.data, delta)?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Write raw bytes to the track body
    pub fn write_data(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    /// Number of bytes written so far, chunk header included
    pub fn position(&self) -> usize {
        self.data.len()
    }

    /// Discard everything written after `position`
    ///
    /// The chunk header is never discarded.
    pub fn rollback(&mut self, position: usize) {
        self.data.truncate(position.max(TRACK_HEADER_SIZE));
    }

    /// Append the end of track marker and patch the chunk length
    pub fn finalize(mut self) -> Result<EncodedTrack> {
        self.write_data(&END_OF_TRACK);

        let body_len = self.data.len() - TRACK_HEADER_SIZE;
        let length = u32::try_from(body_len)
            .map_err(|_| Error::range("track length", body_len as i64, u32::MAX as i64))?;
        self.data[LENGTH_OFFSET..TRACK_HEADER_SIZE].copy_from_slice(&length.to_be_bytes());

        Ok(EncodedTrack { data: self.data })
    }
}

impl Default for TrackWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A finalized, immutable track chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTrack {
    data: Vec<u8>,
}

impl EncodedTrack {
    /// The whole chunk, header included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The event bytes following the chunk header
    pub fn body(&self) -> &[u8] {
        &self.data[TRACK_HEADER_SIZE..]
    }

    /// The value stored in the chunk's length field
    pub fn declared_length(&self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[LENGTH_OFFSET..TRACK_HEADER_SIZE]);
        u32::from_be_bytes(bytes)
    }
}

/// Standard MIDI File writer
///
/// Collects finalized tracks behind a header chunk. The declared track count
/// is checked against the tracks actually supplied when finishing.
#[derive(Debug)]
pub struct SmfWriter {
    file_type: FileType,
    division: u16,
    declared_tracks: u16,
    tracks: Vec<EncodedTrack>,
}

impl SmfWriter {
    pub fn new(file_type: FileType, declared_tracks: u16, division: u16) -> Self {
        Self {
            file_type,
            division,
            declared_tracks,
            tracks: Vec::with_capacity(declared_tracks as usize),
        }
    }

    /// Append a finalized track
    pub fn push_track(&mut self, track: EncodedTrack) {
        self.tracks.push(track);
    }

    /// Number of tracks pushed so far
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Concatenate the header and all tracks into the final buffer
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.tracks.len() != self.declared_tracks as usize {
            return Err(Error::TrackCountMismatch {
                declared: self.declared_tracks as usize,
                actual: self.tracks.len(),
            });
        }

        let header = HeaderChunk::new(self.file_type, self.declared_tracks, self.division);
        let total = HEADER_SIZE
            + self
                .tracks
                .iter()
                .map(|t| t.as_bytes().len())
                .sum::<usize>();

        let mut data = Vec::with_capacity(total);
        data.extend_from_slice(header.as_bytes());
        for track in &self.tracks {
            data.extend_from_slice(track.as_bytes());
        }

        tracing::debug!(
            tracks = self.tracks.len(),
            bytes = data.len(),
            "assembled MIDI file"
        );

        Ok(data)
    }
}
