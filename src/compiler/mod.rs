//! Event description compiler - turns a `MidiFile` into SMF bytes

pub mod arpeggio;
pub mod encoder;
pub mod entropy;
pub mod event;
pub mod ramp;
pub mod track;

use crate::error::Result;
use crate::smf::SmfWriter;
use entropy::Entropy;
use event::{Event, MidiFile};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Which event types a build accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Every event type
    #[default]
    Full,
    /// Notes, chords and arpeggios only
    Basic,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Basic => "basic",
        }
    }

    /// Whether an event may appear in a track built with this profile
    pub fn allows(&self, event: &Event) -> bool {
        match self {
            Self::Full => true,
            Self::Basic => matches!(event, Event::NoteGroup { .. } | Event::Arpeggio { .. }),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "basic" => Ok(Self::Basic),
            _ => Err(format!("unknown profile '{}' (expected 'full' or 'basic')", s)),
        }
    }
}

/// Build configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub profile: Profile,
    /// Seed for random arpeggios; fresh entropy when `None`
    pub seed: Option<u64>,
}

/// Main compiler state
pub struct Compiler {
    options: BuildOptions,
    rng: fastrand::Rng,
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            rng: entropy::seeded(options.seed),
            options,
        }
    }

    /// Build the complete file image for a description
    pub fn build(&mut self, file: &MidiFile) -> Result<Vec<u8>> {
        assemble(file, self.options.profile, &mut self.rng)
    }

    /// Parse a JSON event description
    pub fn read_description<R: Read>(input: R) -> Result<MidiFile> {
        Ok(serde_json::from_reader(input)?)
    }

    /// Compile a JSON description to a MIDI file
    ///
    /// The output file is only created once the whole image has been built.
    pub fn compile<R: Read>(&mut self, input: R, output: &Path) -> Result<()> {
        let file = Self::read_description(input)?;
        let data = self.build(&file)?;
        std::fs::write(output, &data)?;

        tracing::info!(
            path = %output.display(),
            bytes = data.len(),
            tracks = file.tracks.len(),
            "wrote MIDI file"
        );
        Ok(())
    }

    /// Compile a JSON description file to a MIDI file
    pub fn compile_file(&mut self, input: &Path, output: &Path) -> Result<()> {
        let reader = BufReader::new(File::open(input)?);
        self.compile(reader, output)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the complete file image with every event type enabled
pub fn build_file(file: &MidiFile, entropy: &mut dyn Entropy) -> Result<Vec<u8>> {
    assemble(file, Profile::Full, entropy)
}

fn assemble(file: &MidiFile, profile: Profile, entropy: &mut dyn Entropy) -> Result<Vec<u8>> {
    let declared = file.declared_tracks()?;
    let mut smf = SmfWriter::new(file.format, declared, file.division);

    for (index, track) in file.tracks.iter().enumerate() {
        let encoded = track::build(track, profile, entropy).inspect_err(|e| {
            tracing::warn!(track = index, error = %e, "track build failed");
        })?;
        smf.push_track(encoded);
    }

    smf.finish()
}
