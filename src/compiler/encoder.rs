//! Per-event byte serialization
//!
//! Each function checks every field before touching the writer, so a
//! rejected event leaves the track exactly as it was.

use crate::error::{Error, Result};
use crate::smf::message::{self, channel_status, meta, status, MAX_CHANNEL, MAX_DATA, MAX_PITCH_WHEEL};
use crate::smf::{vlq, TrackWriter};

/// Largest chord a single note group may hold
pub const MAX_CHORD_SIZE: usize = 4;

/// Check a channel number and narrow it to its 4-bit form
pub fn check_channel(channel: u32) -> Result<u8> {
    narrow("channel", channel, MAX_CHANNEL as u32).map(|c| c as u8)
}

/// Check a 7-bit data byte
pub fn check_data(field: &'static str, value: u32) -> Result<u8> {
    narrow(field, value, MAX_DATA as u32).map(|v| v as u8)
}

pub fn check_pitch_wheel(value: u32) -> Result<u16> {
    narrow("pitch wheel value", value, MAX_PITCH_WHEEL as u32).map(|v| v as u16)
}

fn narrow(field: &'static str, value: u32, max: u32) -> Result<u32> {
    if value > max {
        return Err(Error::range(field, value, max as i64));
    }
    Ok(value)
}

/// `00 Cn pp`
pub fn program_change(writer: &mut TrackWriter, channel: u32, program: u32) -> Result<()> {
    let channel = check_channel(channel)?;
    let program = check_data("program", program)?;

    writer.write_event(
        0,
        &[channel_status(status::PROGRAM_CHANGE, channel), program],
    )
}

/// `00 FF 20 01 cc`
pub fn channel_prefix(writer: &mut TrackWriter, channel: u32) -> Result<()> {
    let channel = check_channel(channel)?;

    writer.write_event(
        0,
        &[status::META, meta::CHANNEL_PREFIX, 0x01, channel],
    )
}

/// `dt Bn cc vv`
pub fn control_change(
    writer: &mut TrackWriter,
    channel: u32,
    delta_time: u32,
    controller: u32,
    value: u32,
) -> Result<()> {
    let channel = check_channel(channel)?;
    vlq::check("delta time", delta_time)?;
    let controller = check_data("controller", controller)?;
    let value = check_data("control value", value)?;

    write_control_change(writer, channel, delta_time, controller, value)
}

/// `dt En ll hh`
pub fn pitch_wheel(writer: &mut TrackWriter, channel: u32, delta_time: u32, value: u32) -> Result<()> {
    let channel = check_channel(channel)?;
    vlq::check("delta time", delta_time)?;
    let value = check_pitch_wheel(value)?;

    write_pitch_wheel(writer, channel, delta_time, value)
}

/// Write a chord as N note-ons followed by N note-offs
///
/// Only the first note-on carries `delta_time` and only the first note-off
/// carries `duration`; the rest use delta 0. Note-offs are note-ons with
/// velocity 0, in the same pitch order.
pub fn note_group(
    writer: &mut TrackWriter,
    channel: u32,
    delta_time: u32,
    duration: u32,
    velocity: u32,
    pitches: &[u32],
) -> Result<()> {
    let (channel, velocity) = check_note_fields(channel, delta_time, duration, velocity)?;
    if pitches.is_empty() || pitches.len() > MAX_CHORD_SIZE {
        return Err(Error::InvalidRange {
            field: "pitch count",
            value: pitches.len() as i64,
            min: 1,
            max: MAX_CHORD_SIZE as i64,
        });
    }
    let mut chord = [0u8; MAX_CHORD_SIZE];
    for (slot, &pitch) in chord.iter_mut().zip(pitches) {
        *slot = check_data("pitch", pitch)?;
    }

    write_note_group(
        writer,
        channel,
        delta_time,
        duration,
        velocity,
        &chord[..pitches.len()],
    )
}

/// Field checks shared by note groups and arpeggios; returns the narrowed
/// channel and velocity
pub(crate) fn check_note_fields(
    channel: u32,
    delta_time: u32,
    duration: u32,
    velocity: u32,
) -> Result<(u8, u8)> {
    let channel = check_channel(channel)?;
    vlq::check("delta time", delta_time)?;
    vlq::check("duration", duration)?;
    Ok((channel, check_data("velocity", velocity)?))
}

pub(crate) fn write_control_change(
    writer: &mut TrackWriter,
    channel: u8,
    delta_time: u32,
    controller: u8,
    value: u8,
) -> Result<()> {
    writer.write_event(
        delta_time,
        &[
            channel_status(status::CONTROL_CHANGE, channel),
            controller,
            value,
        ],
    )
}

pub(crate) fn write_pitch_wheel(
    writer: &mut TrackWriter,
    channel: u8,
    delta_time: u32,
    value: u16,
) -> Result<()> {
    let (lsb, msb) = message::split_14bit(value);
    writer.write_event(
        delta_time,
        &[channel_status(status::PITCH_WHEEL, channel), lsb, msb],
    )
}

pub(crate) fn write_note_group(
    writer: &mut TrackWriter,
    channel: u8,
    delta_time: u32,
    duration: u32,
    velocity: u8,
    pitches: &[u8],
) -> Result<()> {
    let note_on = channel_status(status::NOTE_ON, channel);

    for (i, &pitch) in pitches.iter().enumerate() {
        let delta = if i == 0 { delta_time } else { 0 };
        writer.write_event(delta, &[note_on, pitch, velocity])?;
    }
    for (i, &pitch) in pitches.iter().enumerate() {
        let delta = if i == 0 { duration } else { 0 };
        writer.write_event(delta, &[note_on, pitch, 0x00])?;
    }
    Ok(())
}
