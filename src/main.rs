use clap::Parser;
use smfgen::{BuildOptions, Compiler, Profile};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "smfgen")]
#[command(version = "0.1.0")]
#[command(about = "Event description to Standard MIDI File compiler", long_about = None)]
struct Args {
    /// Output MIDI file
    output: PathBuf,

    /// Input JSON event description (reads from stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Seed for random arpeggios
    #[arg(short, long)]
    seed: Option<u64>,

    /// Event profile: full or basic
    #[arg(short, long, default_value = "full")]
    profile: Profile,

    /// Log every finalized track
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), smfgen::Error> {
    let args = Args::parse();

    let directive = if args.verbose { "smfgen=debug" } else { "smfgen=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .init();

    let mut compiler = Compiler::with_options(BuildOptions {
        profile: args.profile,
        seed: args.seed,
    });

    match &args.input {
        Some(path) => compiler.compile_file(path, &args.output)?,
        None => compiler.compile(std::io::stdin(), &args.output)?,
    }

    Ok(())
}
