//! Track assembly
//!
//! Events are encoded strictly in list order into one `TrackWriter`. The
//! first invalid event aborts the track and its buffer is dropped.

use super::arpeggio::{self, Arpeggio};
use super::encoder;
use super::entropy::Entropy;
use super::event::{Event, Track};
use super::ramp::{self, Ramp};
use super::Profile;
use crate::error::{Error, Result};
use crate::smf::{EncodedTrack, TrackWriter};

/// Builds one track chunk
pub struct TrackBuilder<'a> {
    writer: TrackWriter,
    /// Running channel, rebound by channel prefix events
    channel: u32,
    profile: Profile,
    entropy: &'a mut dyn Entropy,
}

impl<'a> TrackBuilder<'a> {
    pub fn new(channel: u32, profile: Profile, entropy: &'a mut dyn Entropy) -> Result<Self> {
        encoder::check_channel(channel)?;
        Ok(Self {
            writer: TrackWriter::new(),
            channel,
            profile,
            entropy,
        })
    }

    /// Encode one event onto the end of the track
    pub fn push(&mut self, event: &Event) -> Result<()> {
        if !self.profile.allows(event) {
            return Err(Error::UnsupportedEvent {
                kind: event.kind(),
                profile: self.profile.name(),
            });
        }

        let channel = self.channel;
        let writer = &mut self.writer;
        match event {
            Event::NoteGroup {
                delta_time,
                duration,
                velocity,
                pitches,
            } => encoder::note_group(writer, channel, *delta_time, *duration, *velocity, pitches),
            Event::ProgramChange { program } => encoder::program_change(writer, channel, *program),
            Event::ChannelPrefixMeta { channel } => {
                encoder::channel_prefix(writer, *channel)?;
                self.channel = *channel;
                Ok(())
            }
            Event::ControlChange {
                delta_time,
                controller,
                value,
            } => encoder::control_change(writer, channel, *delta_time, *controller, *value),
            Event::PitchWheelChange { delta_time, value } => {
                encoder::pitch_wheel(writer, channel, *delta_time, *value)
            }
            Event::RampControlChange {
                delta_time,
                controller,
                start,
                end,
                duration,
                steps,
            } => {
                let ramp = Ramp {
                    delta_time: *delta_time,
                    start: *start,
                    end: *end,
                    duration: *duration,
                    steps: *steps,
                };
                ramp::control_change(writer, channel, *controller, &ramp)
            }
            Event::RampPitchWheelChange {
                delta_time,
                start,
                end,
                duration,
                steps,
            } => {
                let ramp = Ramp {
                    delta_time: *delta_time,
                    start: *start,
                    end: *end,
                    duration: *duration,
                    steps: *steps,
                };
                ramp::pitch_wheel(writer, channel, &ramp)
            }
            Event::Arpeggio {
                delta_time,
                duration,
                velocity,
                pool,
                play_count,
                mode,
            } => {
                let arp = Arpeggio {
                    delta_time: *delta_time,
                    duration: *duration,
                    velocity: *velocity,
                    pool: pool.as_slice(),
                    play_count: *play_count,
                    mode: *mode,
                };
                arpeggio::write(writer, channel, &arp, &mut *self.entropy)
            }
        }
    }

    /// Write the track's program change, ahead of any listed event
    ///
    /// Not subject to the profile: every profile binds a program per track.
    pub fn program(&mut self, program: u32) -> Result<()> {
        encoder::program_change(&mut self.writer, self.channel, program)
    }

    /// Close the track with the end of track marker and patch its length
    pub fn finish(self) -> Result<EncodedTrack> {
        let track = self.writer.finalize()?;
        tracing::debug!(length = track.declared_length(), "finalized track");
        Ok(track)
    }
}

/// Build a complete track chunk from its description
pub fn build(track: &Track, profile: Profile, entropy: &mut dyn Entropy) -> Result<EncodedTrack> {
    let mut builder = TrackBuilder::new(track.channel, profile, entropy)?;

    if let Some(program) = track.program {
        builder.program(program)?;
    }

    for (index, event) in track.events.iter().enumerate() {
        tracing::trace!(index, kind = event.kind(), "encoding event");
        builder.push(event).inspect_err(|e| {
            tracing::warn!(index, kind = event.kind(), error = %e, "invalid event");
        })?;
    }

    builder.finish()
}
