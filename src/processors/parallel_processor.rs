use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, StationMap};
use crate::processors::{ChunkPlanner, Reducer};
use crate::readers::{AccessMode, ChunkReader, ChunkSummary};
use crate::utils::progress::ProgressReporter;
use crate::writers::SummaryFormatter;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Plans the input into line-aligned chunks, scans them on a dedicated
/// thread pool and reduces the worker maps into one result.
pub struct ParallelProcessor {
    max_workers: usize,
    access_mode: AccessMode,
    show_progress: bool,
}

/// Merged result of a full run.
#[derive(Debug, Default)]
pub struct ProcessingOutcome {
    pub stations: StationMap,
    pub chunks: Vec<Chunk>,
    pub lines: u64,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            access_mode: AccessMode::Mmap,
            show_progress: false,
        }
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Scan the whole file and return the merged per-station aggregates.
    ///
    /// Waits for every chunk before reducing. The first failing chunk fails
    /// the run.
    pub fn process_file(&self, path: &Path) -> Result<ProcessingOutcome> {
        let started = Instant::now();

        let chunks = ChunkPlanner::new(self.max_workers)
            .with_access_mode(self.access_mode)
            .plan(path)?;

        info!(
            path = %path.display(),
            workers = self.max_workers,
            chunks = chunks.len(),
            mode = ?self.access_mode,
            "processing input"
        );

        if chunks.is_empty() {
            return Ok(ProcessingOutcome::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let progress = ProgressReporter::new(
            chunks.len() as u64,
            "Scanning chunks...",
            !self.show_progress,
        );
        let reader = ChunkReader::new(path).with_access_mode(self.access_mode);

        let summaries: Result<Vec<ChunkSummary>> = pool.install(|| {
            chunks
                .par_iter()
                .map(|&chunk| {
                    let summary = reader.read_chunk(chunk);
                    progress.increment(1);
                    summary
                })
                .collect()
        });
        let summaries = summaries?;
        let scanned = started.elapsed();

        let lines: u64 = summaries.iter().map(|s| s.lines).sum();
        let stations = Reducer::reduce(summaries.into_iter().map(|s| s.stations));

        progress.finish_with_message(&format!("Scanned {} lines", lines));
        info!(
            lines,
            stations = stations.len(),
            scan_ms = scanned.as_millis() as u64,
            total_ms = started.elapsed().as_millis() as u64,
            "reduction complete"
        );

        Ok(ProcessingOutcome {
            stations,
            chunks,
            lines,
        })
    }

    /// Process the file and render the sorted `{station=min/mean/max, ...}`
    /// summary.
    pub fn summarize(&self, path: &Path) -> Result<String> {
        let outcome = self.process_file(path)?;
        let summary = SummaryFormatter::new().format(&outcome.stations)?;
        debug!(bytes = summary.len(), "summary rendered");
        Ok(summary)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
