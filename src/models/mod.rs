pub mod aggregate;
pub mod chunk;
pub mod record;

pub use aggregate::{StationAggregate, StationKey, StationMap};
pub use chunk::Chunk;
pub use record::MeasurementRecord;
