use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    InvalidRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Ramp needs at least one step (got {steps})")]
    InvalidRamp { steps: u32 },

    #[error("Arpeggio pool is empty")]
    EmptyPool,

    #[error("Track count mismatch: declared {declared}, supplied {actual}")]
    TrackCountMismatch { declared: usize, actual: usize },

    #[error("Event '{kind}' is not available in the {profile} profile")]
    UnsupportedEvent {
        kind: &'static str,
        profile: &'static str,
    },

    #[error("Description error: {0}")]
    Description(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an `InvalidRange` for an unsigned field with a lower bound of zero
    pub(crate) fn range(field: &'static str, value: impl Into<i64>, max: i64) -> Self {
        Self::InvalidRange {
            field,
            value: value.into(),
            min: 0,
            max,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
