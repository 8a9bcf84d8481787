pub mod header;
pub mod message;
pub mod vlq;
pub mod writer;

pub use header::{FileType, HeaderChunk};
pub use writer::{EncodedTrack, SmfWriter, TrackWriter};
