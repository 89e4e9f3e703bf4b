//! Writing archive entries to disk.

mod engine;
mod stream;

pub use engine::Extractor;
pub use stream::SizeLimitedReader;
