//! Event description model
//!
//! A `MidiFile` is the fully formed input to the compiler. Channel, data and
//! pitch wheel fields are wider than their MIDI limits so that an out of range
//! value in a description reaches the encoder's range checks instead of
//! failing in the deserializer.

use crate::error::{Error, Result};
use crate::smf::FileType;
use serde::{Deserialize, Serialize};

/// How an arpeggio picks pitches from its pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArpMode {
    /// Cycle through the pool in order
    #[default]
    Sequential,
    /// Draw uniformly from the pool, with replacement
    Random,
}

/// A single entry in a track's event list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// One to four pitches starting and ending together
    NoteGroup {
        #[serde(default)]
        delta_time: u32,
        duration: u32,
        velocity: u32,
        pitches: Vec<u32>,
    },
    ProgramChange { program: u32 },
    /// MIDI channel prefix meta event; also rebinds the track's channel
    #[serde(rename = "channel_prefix")]
    ChannelPrefixMeta { channel: u32 },
    ControlChange {
        #[serde(default)]
        delta_time: u32,
        controller: u32,
        value: u32,
    },
    #[serde(rename = "pitch_wheel")]
    PitchWheelChange {
        #[serde(default)]
        delta_time: u32,
        value: u32,
    },
    RampControlChange {
        #[serde(default)]
        delta_time: u32,
        controller: u32,
        start: i64,
        end: i64,
        duration: u32,
        steps: u32,
    },
    #[serde(rename = "ramp_pitch_wheel")]
    RampPitchWheelChange {
        #[serde(default)]
        delta_time: u32,
        start: i64,
        end: i64,
        duration: u32,
        steps: u32,
    },
    Arpeggio {
        #[serde(default)]
        delta_time: u32,
        duration: u32,
        velocity: u32,
        pool: Vec<u32>,
        play_count: u32,
        #[serde(default)]
        mode: ArpMode,
    },
}

impl Event {
    /// A single note
    pub fn note(delta_time: u32, duration: u32, velocity: u32, pitch: u32) -> Self {
        Self::chord(delta_time, duration, velocity, &[pitch])
    }

    /// Several pitches sounding together
    pub fn chord(delta_time: u32, duration: u32, velocity: u32, pitches: &[u32]) -> Self {
        Self::NoteGroup {
            delta_time,
            duration,
            velocity,
            pitches: pitches.to_vec(),
        }
    }

    /// Short name used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoteGroup { .. } => "note_group",
            Self::ProgramChange { .. } => "program_change",
            Self::ChannelPrefixMeta { .. } => "channel_prefix",
            Self::ControlChange { .. } => "control_change",
            Self::PitchWheelChange { .. } => "pitch_wheel",
            Self::RampControlChange { .. } => "ramp_control_change",
            Self::RampPitchWheelChange { .. } => "ramp_pitch_wheel",
            Self::Arpeggio { .. } => "arpeggio",
        }
    }
}

/// One track: its starting channel, optional program and events in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub channel: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<u32>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Track {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    pub fn with_program(mut self, program: u32) -> Self {
        self.program = Some(program);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// A complete file description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiFile {
    pub format: FileType,
    /// Ticks per quarter note
    pub division: u16,
    /// Declared number of tracks; derived from `tracks` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u16>,
    pub tracks: Vec<Track>,
}

impl MidiFile {
    pub fn new(format: FileType, division: u16) -> Self {
        Self {
            format,
            division,
            track_count: None,
            tracks: Vec::new(),
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// The track count to write into the header
    ///
    /// Fails when an explicit count disagrees with the supplied tracks or
    /// when there are more tracks than the header can express.
    pub fn declared_tracks(&self) -> Result<u16> {
        let actual = self.tracks.len();
        match self.track_count {
            Some(declared) if declared as usize == actual => Ok(declared),
            Some(declared) => Err(Error::TrackCountMismatch {
                declared: declared as usize,
                actual,
            }),
            None => u16::try_from(actual).map_err(|_| Error::TrackCountMismatch {
                declared: u16::MAX as usize,
                actual,
            }),
        }
    }
}
