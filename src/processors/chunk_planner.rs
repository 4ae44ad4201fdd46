use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use crate::readers::window::{AccessMode, FileWindow};
use crate::utils::constants::{BOUNDARY_PROBE_LEN, NEWLINE};
use memchr::memchr;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Splits a file into at most `workers` contiguous, line-aligned chunks of
/// roughly equal size.
pub struct ChunkPlanner {
    workers: usize,
    access_mode: AccessMode,
    probe_len: u64,
}

impl ChunkPlanner {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            access_mode: AccessMode::Mmap,
            probe_len: BOUNDARY_PROBE_LEN,
        }
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn with_probe_len(mut self, probe_len: u64) -> Self {
        self.probe_len = probe_len.max(1);
        self
    }

    /// Plan the chunks of the file at `path`.
    pub fn plan(&self, path: &Path) -> Result<Vec<Chunk>> {
        let file = File::open(path).map_err(|source| ProcessingError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let size = file.metadata()?.len();

        self.plan_file(&file, size)
    }

    /// Plan the chunks of an already opened file of `size` bytes.
    ///
    /// Every chunk but the last ends immediately after a `\n`; the last one
    /// always ends at `size`. An empty file yields no chunks.
    pub fn plan_file(&self, file: &File, size: u64) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::with_capacity(self.workers);
        if size == 0 {
            return Ok(chunks);
        }

        let chunk_size = size / self.workers as u64;
        let mut cursor = 0;

        while cursor < size {
            let remaining = size - cursor;
            if chunk_size == 0 || remaining <= chunk_size || chunks.len() + 1 == self.workers {
                chunks.push(Chunk::new(cursor, size));
                break;
            }

            match self.next_line_start(file, cursor + chunk_size, size)? {
                Some(boundary) => {
                    chunks.push(Chunk::new(cursor, boundary));
                    cursor = boundary;
                }
                None => {
                    chunks.push(Chunk::new(cursor, size));
                    break;
                }
            }
        }

        debug!(size, workers = self.workers, chunks = chunks.len(), "chunks planned");

        Ok(chunks)
    }

    /// Offset just past the first `\n` at or after `from`, or `None` when
    /// no terminator precedes EOF (or it is the file's last byte). Probes a
    /// small window and doubles it until a terminator or EOF is reached.
    fn next_line_start(&self, file: &File, from: u64, size: u64) -> Result<Option<u64>> {
        let mut start = from;
        let mut probe_len = self.probe_len;

        while start < size {
            let end = start.saturating_add(probe_len).min(size);
            let window = FileWindow::open(file, Chunk::new(start, end), self.access_mode)?;

            if let Some(position) = memchr(NEWLINE, window.bytes()) {
                let boundary = start + position as u64 + 1;
                return Ok((boundary < size).then_some(boundary));
            }

            start = end;
            probe_len = probe_len.saturating_mul(2);
        }

        Ok(None)
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
