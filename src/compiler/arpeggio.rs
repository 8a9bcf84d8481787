//! Arpeggio sequencing

use super::encoder;
use super::entropy::Entropy;
use super::event::ArpMode;
use crate::error::{Error, Result};
use crate::smf::TrackWriter;

/// An arpeggio over a pool of pitches
#[derive(Debug, Clone, Copy)]
pub struct Arpeggio<'a> {
    pub delta_time: u32,
    pub duration: u32,
    pub velocity: u32,
    pub pool: &'a [u32],
    pub play_count: u32,
    pub mode: ArpMode,
}

impl Arpeggio<'_> {
    /// The pitch played at position `index` of the sequence
    ///
    /// Sequential mode cycles through the pool; random mode draws from it
    /// with replacement. The pool must be non-empty.
    pub fn pick(&self, index: usize, entropy: &mut dyn Entropy) -> Result<u32> {
        let len = self.pool.len();
        if len == 0 {
            return Err(Error::EmptyPool);
        }

        match self.mode {
            ArpMode::Sequential => Ok(self.pool[index % len]),
            ArpMode::Random => {
                let drawn = entropy.next_index(len);
                self.pool
                    .get(drawn)
                    .copied()
                    .ok_or_else(|| Error::range("entropy index", drawn as i64, len as i64 - 1))
            }
        }
    }
}

/// Write each picked pitch as its own single-note group
///
/// Every note reuses the arpeggio's delta time, duration and velocity.
/// Picks are written as they are drawn; if one fails, everything this
/// arpeggio wrote is rolled back.
pub fn write(
    writer: &mut TrackWriter,
    channel: u32,
    arpeggio: &Arpeggio<'_>,
    entropy: &mut dyn Entropy,
) -> Result<()> {
    let (channel, velocity) = encoder::check_note_fields(
        channel,
        arpeggio.delta_time,
        arpeggio.duration,
        arpeggio.velocity,
    )?;
    for &pitch in arpeggio.pool {
        encoder::check_data("pitch", pitch)?;
    }
    if arpeggio.play_count == 0 {
        return Ok(());
    }
    if arpeggio.pool.is_empty() {
        return Err(Error::EmptyPool);
    }

    tracing::trace!(notes = arpeggio.play_count, mode = ?arpeggio.mode, "arpeggio");

    let mark = writer.position();
    let result = (0..arpeggio.play_count as usize).try_for_each(|index| {
        // Every pool entry was checked above
        let pitch = arpeggio.pick(index, entropy)? as u8;
        encoder::write_note_group(
            writer,
            channel,
            arpeggio.delta_time,
            arpeggio.duration,
            velocity,
            &[pitch],
        )
    });

    if result.is_err() {
        writer.rollback(mark);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of indices
    struct Scripted(std::vec::IntoIter<usize>);

    impl Scripted {
        fn new(indices: &[usize]) -> Self {
            Self(indices.to_vec().into_iter())
        }
    }

    impl Entropy for Scripted {
        fn next_index(&mut self, _bound: usize) -> usize {
            self.0.next().unwrap_or(0)
        }
    }

    fn arp(pool: &[u32], play_count: u32, mode: ArpMode) -> Arpeggio<'_> {
        Arpeggio {
            delta_time: 0,
            duration: 24,
            velocity: 90,
            pool,
            play_count,
            mode,
        }
    }

    fn picks(a: &Arpeggio<'_>, entropy: &mut dyn Entropy) -> Result<Vec<u32>> {
        (0..a.play_count as usize)
            .map(|i| a.pick(i, entropy))
            .collect()
    }

    /// Pitches of the note-ons in a written track body
    fn played(writer: TrackWriter) -> Vec<u8> {
        let track = writer.finalize().unwrap();
        track
            .body()
            .chunks(8)
            .filter(|c| c.len() == 8)
            .map(|c| c[2])
            .collect()
    }

    #[test]
    fn test_sequential_wraps() {
        let a = arp(&[60, 64, 67], 7, ArpMode::Sequential);
        assert_eq!(
            picks(&a, &mut Scripted::new(&[])).unwrap(),
            vec![60, 64, 67, 60, 64, 67, 60]
        );
    }

    #[test]
    fn test_sequential_shorter_than_pool() {
        let a = arp(&[60, 64, 67], 2, ArpMode::Sequential);
        assert_eq!(picks(&a, &mut Scripted::new(&[])).unwrap(), vec![60, 64]);
    }

    #[test]
    fn test_random_uses_entropy() {
        let a = arp(&[60, 64, 67], 5, ArpMode::Random);
        assert_eq!(
            picks(&a, &mut Scripted::new(&[2, 2, 0, 1, 0])).unwrap(),
            vec![67, 67, 60, 64, 60]
        );
    }

    #[test]
    fn test_random_draws_from_pool() {
        let pool = [48, 55, 60, 63];
        let mut writer = TrackWriter::new();
        let a = arp(&pool, 200, ArpMode::Random);
        write(&mut writer, 0, &a, &mut fastrand::Rng::with_seed(42)).unwrap();

        let pitches = played(writer);
        assert_eq!(pitches.len(), 200);
        assert!(pitches.iter().all(|&p| pool.contains(&(p as u32))));
    }

    #[test]
    fn test_bad_entropy_index() {
        let a = arp(&[60, 64], 1, ArpMode::Random);
        assert!(matches!(
            a.pick(0, &mut Scripted::new(&[2])),
            Err(Error::InvalidRange { field: "entropy index", .. })
        ));
    }

    #[test]
    fn test_bad_entropy_rolls_back_partial_output() {
        let mut writer = TrackWriter::new();
        write(
            &mut writer,
            0,
            &arp(&[72], 1, ArpMode::Sequential),
            &mut Scripted::new(&[]),
        )
        .unwrap();
        let before = writer.position();

        // Two good picks, then an index past the pool, out of a huge count
        let a = arp(&[60, 64], u32::MAX, ArpMode::Random);
        assert!(matches!(
            write(&mut writer, 0, &a, &mut Scripted::new(&[0, 1, 9])),
            Err(Error::InvalidRange { field: "entropy index", .. })
        ));
        assert_eq!(writer.position(), before);
        assert_eq!(played(writer), vec![72]);
    }

    #[test]
    fn test_empty_pool() {
        let mut writer = TrackWriter::new();
        assert!(matches!(
            write(
                &mut writer,
                0,
                &arp(&[], 3, ArpMode::Sequential),
                &mut Scripted::new(&[])
            ),
            Err(Error::EmptyPool)
        ));
        assert!(write(
            &mut writer,
            0,
            &arp(&[], 0, ArpMode::Random),
            &mut Scripted::new(&[])
        )
        .is_ok());
        assert_eq!(writer.position(), 8);
    }

    #[test]
    fn test_write_repeats_timing() {
        let mut writer = TrackWriter::new();
        let a = Arpeggio {
            delta_time: 12,
            ..arp(&[60, 62], 3, ArpMode::Sequential)
        };
        write(&mut writer, 0, &a, &mut Scripted::new(&[])).unwrap();
        let track = writer.finalize().unwrap();
        assert_eq!(
            track.body(),
            &[
                0x0C, 0x90, 60, 90, 0x18, 0x90, 60, 0x00, //
                0x0C, 0x90, 62, 90, 0x18, 0x90, 62, 0x00, //
                0x0C, 0x90, 60, 90, 0x18, 0x90, 60, 0x00, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn test_write_checks_pool_before_writing() {
        let mut writer = TrackWriter::new();
        let a = arp(&[60, 128], 4, ArpMode::Sequential);
        assert!(matches!(
            write(&mut writer, 0, &a, &mut Scripted::new(&[])),
            Err(Error::InvalidRange { field: "pitch", value: 128, .. })
        ));
        assert_eq!(writer.position(), 8);
    }
}
