use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, StationAggregate, StationMap};
use crate::readers::line_parser::parse_line;
use crate::readers::window::{AccessMode, FileWindow};
use crate::utils::constants::{CARRIAGE_RETURN, DEFAULT_STATION_CAPACITY, NEWLINE};
use memchr::memchr;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of scanning one chunk.
#[derive(Debug, Default)]
pub struct ChunkSummary {
    pub stations: StationMap,
    pub lines: u64,
}

/// Scans one line-aligned byte range of the input into a worker-local
/// station map.
pub struct ChunkReader {
    path: PathBuf,
    access_mode: AccessMode,
}

impl ChunkReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            access_mode: AccessMode::Mmap,
        }
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    /// Open the file, acquire a window over `chunk` and aggregate every line
    /// in it. File handle and window are released on every return path.
    pub fn read_chunk(&self, chunk: Chunk) -> Result<ChunkSummary> {
        let file = File::open(&self.path).map_err(|source| ProcessingError::FileAccess {
            path: self.path.clone(),
            source,
        })?;
        let window = FileWindow::open(&file, chunk, self.access_mode)?;

        let mut summary = ChunkSummary {
            stations: StationMap::with_capacity(DEFAULT_STATION_CAPACITY),
            lines: 0,
        };
        summary.lines = scan_lines(window.bytes(), chunk.start, &mut summary.stations)?;

        debug!(
            chunk = %chunk,
            lines = summary.lines,
            stations = summary.stations.len(),
            "chunk scanned"
        );

        Ok(summary)
    }
}

/// Aggregate every line of `bytes` into `stations`. `base_offset` is the
/// absolute file position of `bytes[0]`, used for error reporting. A final
/// line without a terminator is still counted. Returns the number of
/// records observed.
pub fn scan_lines(bytes: &[u8], base_offset: u64, stations: &mut StationMap) -> Result<u64> {
    let mut position = 0;
    let mut lines = 0;

    while position < bytes.len() {
        let line_end = memchr(NEWLINE, &bytes[position..]).map_or(bytes.len(), |i| position + i);
        let line = &bytes[position..line_end];
        let line = line.strip_suffix(&[CARRIAGE_RETURN]).unwrap_or(line);

        if !line.is_empty() {
            let record = parse_line(line).map_err(|source| ProcessingError::Parse {
                offset: base_offset + position as u64,
                source,
            })?;

            match stations.get_mut(record.station) {
                Some(aggregate) => aggregate.observe(record.value),
                None => {
                    stations.insert(
                        record.station.into(),
                        StationAggregate::from_value(record.value),
                    );
                }
            }
            lines += 1;
        }

        position = line_end + 1;
    }

    Ok(lines)
}
