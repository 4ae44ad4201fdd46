pub mod chunk_reader;
pub mod line_parser;
pub mod window;

pub use chunk_reader::{scan_lines, ChunkReader, ChunkSummary};
pub use line_parser::parse_line;
pub use window::{allocation_granularity, AccessMode, FileWindow};
