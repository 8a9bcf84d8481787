pub mod compiler;
pub mod error;
pub mod smf;

pub use compiler::{build_file, BuildOptions, Compiler, Profile};
pub use error::Error;
