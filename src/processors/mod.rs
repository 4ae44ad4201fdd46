pub mod chunk_planner;
pub mod parallel_processor;
pub mod reducer;

pub use chunk_planner::ChunkPlanner;
pub use parallel_processor::{ParallelProcessor, ProcessingOutcome};
pub use reducer::Reducer;
