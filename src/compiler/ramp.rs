//! Linear parameter ramps
//!
//! A ramp becomes `steps + 1` messages: the start value at the ramp's own
//! delta time, then one message per step. Step times are recomputed from the
//! absolute target each step so the deltas always sum to `duration`.

use super::encoder;
use crate::error::{Error, Result};
use crate::smf::message::{MAX_DATA, MAX_PITCH_WHEEL};
use crate::smf::{vlq, TrackWriter};

/// A ramp from `start` to `end` over `duration` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    pub delta_time: u32,
    pub start: i64,
    pub end: i64,
    pub duration: u32,
    pub steps: u32,
}

/// One generated ramp message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampStep {
    pub delta: u32,
    pub value: i64,
}

impl Ramp {
    /// Check the ramp and return its message sequence
    ///
    /// Steps are produced lazily, so the step count never drives an
    /// allocation. Every delta the sequence will yield is known to fit a VLQ
    /// once this returns `Ok`.
    pub fn generate(&self) -> Result<RampSteps> {
        if self.steps == 0 {
            return Err(Error::InvalidRamp { steps: self.steps });
        }
        vlq::check("delta time", self.delta_time)?;

        // Consecutive floor(duration * i / steps) differ by at most
        // ceil(duration / steps)
        let largest = (self.duration as u64).div_ceil(self.steps as u64);
        if largest > vlq::MAX_VALUE as u64 {
            return Err(Error::range("ramp step delta", largest as i64, vlq::MAX_VALUE as i64));
        }

        Ok(RampSteps {
            ramp: *self,
            next: 0,
            elapsed: 0,
        })
    }

    fn check_bounds(&self, field: &'static str, max: i64) -> Result<()> {
        for value in [self.start, self.end] {
            if !(0..=max).contains(&value) {
                return Err(Error::range(field, value, max));
            }
        }
        Ok(())
    }
}

/// Iterator over the `steps + 1` messages of a checked ramp
#[derive(Debug, Clone)]
pub struct RampSteps {
    ramp: Ramp,
    next: u64,
    elapsed: u64,
}

impl Iterator for RampSteps {
    type Item = RampStep;

    fn next(&mut self) -> Option<RampStep> {
        let i = self.next;
        let steps = self.ramp.steps as u64;
        if i > steps {
            return None;
        }
        self.next += 1;

        if i == 0 {
            return Some(RampStep {
                delta: self.ramp.delta_time,
                value: self.ramp.start,
            });
        }

        // i128 keeps i * diff exact for any i64 endpoints
        let start = self.ramp.start as i128;
        let diff = self.ramp.end as i128 - start;
        let value = start + i as i128 * diff / steps as i128;

        let target = self.ramp.duration as u64 * i / steps;
        let delta = target - self.elapsed;
        self.elapsed += delta;

        Some(RampStep {
            // Bounded by the largest-delta check in `generate`
            delta: delta as u32,
            // Always between start and end
            value: value as i64,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.ramp.steps as u64 + 1).saturating_sub(self.next);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Write a control change ramp (values 0..=127)
pub fn control_change(writer: &mut TrackWriter, channel: u32, controller: u32, ramp: &Ramp) -> Result<()> {
    let channel = encoder::check_channel(channel)?;
    let controller = encoder::check_data("controller", controller)?;
    ramp.check_bounds("control ramp value", MAX_DATA as i64)?;

    for step in ramp.generate()? {
        encoder::write_control_change(writer, channel, step.delta, controller, step.value as u8)?;
    }
    Ok(())
}

/// Write a pitch wheel ramp (values 0..=16383)
pub fn pitch_wheel(writer: &mut TrackWriter, channel: u32, ramp: &Ramp) -> Result<()> {
    let channel = encoder::check_channel(channel)?;
    ramp.check_bounds("pitch wheel ramp value", MAX_PITCH_WHEEL as i64)?;

    for step in ramp.generate()? {
        encoder::write_pitch_wheel(writer, channel, step.delta, step.value as u16)?;
    }
    Ok(())
}
