use brc_processor::models::{Chunk, StationAggregate};
use brc_processor::processors::{ChunkPlanner, ParallelProcessor, Reducer};
use brc_processor::readers::{AccessMode, ChunkReader};
use brc_processor::writers::SummaryFormatter;
use brc_processor::ProcessingError;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const STATIONS: &[&str] = &[
    "Abha", "Berlin", "Cape Town", "Dakar", "Hamburg", "İzmir", "Oslo", "Reykjavík", "São Paulo",
    "Zürich",
];

fn write_fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Deterministic measurements in quarter-degree steps so sums are exact
/// regardless of how the lines are grouped.
fn generate_measurements(lines: usize) -> String {
    let mut content = String::new();
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..lines {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let station = STATIONS[(state % STATIONS.len() as u64) as usize];
        let quarters = (state >> 8) % 400;
        let value = quarters as f64 * 0.25 - 50.0;
        content.push_str(&format!("{};{}\n", station, value));
    }
    content
}

fn summarize(path: &Path, workers: usize, mode: AccessMode) -> String {
    ParallelProcessor::new(workers)
        .with_access_mode(mode)
        .summarize(path)
        .unwrap()
}

#[test]
fn test_documented_example() {
    let file = write_fixture("Hamburg;12.0\nHamburg;14.0\nBerlin;5.0\n");

    assert_eq!(
        summarize(file.path(), 4, AccessMode::Mmap),
        "{Berlin=5.0/5.0/5.0, Hamburg=12.0/13.0/14.0}"
    );
}

#[test]
fn test_unterminated_final_line_for_any_worker_count() {
    let file = write_fixture("X;1.0\nX;3.0");

    for workers in 1..=12 {
        for mode in [AccessMode::Mmap, AccessMode::Buffered] {
            assert_eq!(summarize(file.path(), workers, mode), "{X=1.0/2.0/3.0}");
        }
    }
}

#[test]
fn test_empty_file() {
    let file = write_fixture("");

    assert_eq!(summarize(file.path(), 8, AccessMode::Mmap), "{}");
    assert_eq!(summarize(file.path(), 1, AccessMode::Buffered), "{}");
}

#[test]
fn test_chunked_output_matches_sequential_scan() {
    let file = write_fixture(&generate_measurements(5_000));
    let sequential = summarize(file.path(), 1, AccessMode::Mmap);

    for workers in [2, 3, 4, 7, 8, 16, 31] {
        assert_eq!(summarize(file.path(), workers, AccessMode::Mmap), sequential, "workers={workers}");
        assert_eq!(
            summarize(file.path(), workers, AccessMode::Buffered),
            sequential,
            "buffered workers={workers}"
        );
    }
}

#[test]
fn test_output_sorted_and_deduplicated() {
    let file = write_fixture(&generate_measurements(2_000));
    let summary = summarize(file.path(), 8, AccessMode::Mmap);

    let inner = summary
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .expect("summary is wrapped in braces");
    let names: Vec<&str> = inner
        .split(", ")
        .map(|entry| entry.split_once('=').expect("entry has '='").0)
        .collect();

    let mut expected: Vec<&str> = STATIONS.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[test]
fn test_manual_pipeline_matches_processor() {
    let content = generate_measurements(1_000);
    let file = write_fixture(&content);

    let chunks = ChunkPlanner::new(5).plan(file.path()).unwrap();
    assert_eq!(chunks.first().map(|c| c.start), Some(0));
    assert_eq!(chunks.last().map(|c| c.end), Some(content.len() as u64));

    let reader = ChunkReader::new(file.path());
    let partials: Vec<_> = chunks
        .iter()
        .rev()
        .map(|&chunk| reader.read_chunk(chunk).unwrap().stations)
        .collect();
    let merged = Reducer::reduce(partials);

    let total: u64 = merged.values().map(|a: &StationAggregate| a.count).sum();
    assert_eq!(total, 1_000);

    let manual = SummaryFormatter::new().format(&merged).unwrap();
    assert_eq!(manual, summarize(file.path(), 5, AccessMode::Mmap));
}

#[test]
fn test_chunk_boundaries_follow_terminators() {
    let content = generate_measurements(800);
    let file = write_fixture(&content);
    let bytes = content.as_bytes();

    for workers in 1..=32 {
        let chunks = ChunkPlanner::new(workers).plan(file.path()).unwrap();
        let mut cursor = 0;
        for chunk in &chunks {
            assert_eq!(chunk.start, cursor);
            assert!(chunk.end > chunk.start);
            if chunk.end != bytes.len() as u64 {
                assert_eq!(bytes[chunk.end as usize - 1], b'\n');
            }
            cursor = chunk.end;
        }
        assert_eq!(cursor, bytes.len() as u64);
    }
}

#[test]
fn test_malformed_line_fails_whole_run() {
    let mut content = generate_measurements(500);
    let offset = content.len() as u64;
    content.push_str("no delimiter here\n");
    content.push_str(&generate_measurements(500));
    let file = write_fixture(&content);

    for workers in [1, 4, 9] {
        let result = ParallelProcessor::new(workers).summarize(file.path());
        match result {
            Err(ProcessingError::Parse { offset: found, .. }) => assert_eq!(found, offset),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_input_file() {
    let result = ParallelProcessor::new(2).summarize(Path::new("/nonexistent/measurements.txt"));
    assert!(matches!(result, Err(ProcessingError::FileAccess { .. })));
}

#[test]
fn test_reader_rejects_empty_chunk() {
    let file = write_fixture("A;1.0\n");
    let result = ChunkReader::new(file.path()).read_chunk(Chunk::new(3, 3));
    assert!(matches!(result, Err(ProcessingError::Mapping { .. })));
}
