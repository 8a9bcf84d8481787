//! SMF header chunk definitions and writing

use serde::{Deserialize, Serialize};

/// Header chunk magic
pub const HEADER_MAGIC: &[u8; 4] = b"MThd";

/// Header chunk data length, always 6
pub const HEADER_DATA_LEN: u32 = 6;

/// Full header chunk size in bytes (magic + length + data)
pub const HEADER_SIZE: usize = 14;

/// Header chunk offsets (in bytes)
pub mod offset {
    /// "MThd" identifier
    pub const IDENT: usize = 0x00;
    /// Chunk data length
    pub const LENGTH: usize = 0x04;
    /// File format type
    pub const FORMAT: usize = 0x08;
    /// Number of track chunks
    pub const TRACK_COUNT: usize = 0x0A;
    /// Ticks per quarter note
    pub const DIVISION: usize = 0x0C;
}

/// SMF format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum FileType {
    /// A single multi-channel track
    SingleTrack = 0,
    /// Simultaneous tracks
    Parallel = 1,
    /// Independent sequential patterns
    Sequential = 2,
}

impl TryFrom<u16> for FileType {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SingleTrack),
            1 => Ok(Self::Parallel),
            2 => Ok(Self::Sequential),
            _ => Err(format!("invalid MIDI file type {} (expected 0, 1 or 2)", value)),
        }
    }
}

impl From<FileType> for u16 {
    fn from(file_type: FileType) -> u16 {
        file_type as u16
    }
}

/// SMF header chunk
#[derive(Debug, Clone)]
pub struct HeaderChunk {
    data: [u8; HEADER_SIZE],
}

impl HeaderChunk {
    pub fn new(file_type: FileType, track_count: u16, division: u16) -> Self {
        let mut header = Self {
            data: [0; HEADER_SIZE],
        };

        header.data[offset::IDENT..offset::IDENT + 4].copy_from_slice(HEADER_MAGIC);
        header.write_u32(offset::LENGTH, HEADER_DATA_LEN);
        header.write_u16(offset::FORMAT, file_type.into());
        header.write_u16(offset::TRACK_COUNT, track_count);
        header.write_u16(offset::DIVISION, division);

        header
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) {
        if offset + 1 < HEADER_SIZE {
            self.data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        }
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        if offset + 3 < HEADER_SIZE {
            self.data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
