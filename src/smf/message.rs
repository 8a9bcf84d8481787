//! MIDI status bytes and meta event types

/// Channel voice status bytes (high nibble, OR with the channel)
///
/// Note-off is written as a note-on with velocity 0.
pub mod status {
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const PITCH_WHEEL: u8 = 0xE0;
    /// Meta event prefix
    pub const META: u8 = 0xFF;
}

/// Meta event types
pub mod meta {
    /// MIDI channel prefix (length 1)
    pub const CHANNEL_PREFIX: u8 = 0x20;
    /// End of track (length 0)
    pub const END_OF_TRACK: u8 = 0x2F;
}

/// Highest MIDI channel number
pub const MAX_CHANNEL: u8 = 0x0F;

/// Highest value of a 7-bit data byte
pub const MAX_DATA: u8 = 0x7F;

/// Highest 14-bit pitch wheel value
pub const MAX_PITCH_WHEEL: u16 = 0x3FFF;

/// Combine a status nibble with a channel
pub fn channel_status(status: u8, channel: u8) -> u8 {
    status | (channel & MAX_CHANNEL)
}

/// Split a 14-bit value into (LSB, MSB) data bytes
pub fn split_14bit(value: u16) -> (u8, u8) {
    ((value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
}
