use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use crate::utils::constants::FALLBACK_ALLOCATION_GRANULARITY;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Deref;

/// How a [`FileWindow`] obtains its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Zero-copy read-only memory map.
    #[default]
    Mmap,
    /// Seek and read the range into an owned buffer.
    Buffered,
}

impl AccessMode {
    pub fn from_use_mmap(use_mmap: bool) -> Self {
        if use_mmap {
            AccessMode::Mmap
        } else {
            AccessMode::Buffered
        }
    }
}

enum Backing {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Deref for Backing {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Buffered(buffer) => &buffer[..],
        }
    }
}

/// Read-only view over exactly the bytes `[start, end)` of a file.
///
/// Memory maps must begin on a multiple of the platform allocation
/// granularity, so the mapping starts at `start` rounded down and the
/// logical view skips the leading `start - aligned_start` bytes. The
/// mapping is released when the window is dropped.
pub struct FileWindow {
    backing: Backing,
    skip: usize,
    len: usize,
}

impl FileWindow {
    pub fn open(file: &File, chunk: Chunk, mode: AccessMode) -> Result<Self> {
        if chunk.is_empty() {
            return Err(ProcessingError::Mapping {
                start: chunk.start,
                end: chunk.end,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cannot open a window over an empty range",
                ),
            });
        }

        match mode {
            AccessMode::Mmap => Self::map(file, chunk),
            AccessMode::Buffered => Self::read(file, chunk),
        }
    }

    fn map(file: &File, chunk: Chunk) -> Result<Self> {
        let aligned_start = align_down(chunk.start, allocation_granularity());
        let skip = (chunk.start - aligned_start) as usize;
        let map_len = usize::try_from(chunk.end - aligned_start)
            .map_err(|e| mapping_error(chunk, std::io::Error::other(e)))?;

        // SAFETY: the map is read-only and the input file is not expected
        // to be modified while it is being processed.
        let mmap = unsafe {
            MmapOptions::new()
                .offset(aligned_start)
                .len(map_len)
                .map(file)
        }
        .map_err(|e| mapping_error(chunk, e))?;

        Ok(Self {
            backing: Backing::Mapped(mmap),
            skip,
            len: chunk.len() as usize,
        })
    }

    fn read(file: &File, chunk: Chunk) -> Result<Self> {
        let len = usize::try_from(chunk.len())
            .map_err(|e| mapping_error(chunk, std::io::Error::other(e)))?;
        let mut buffer = vec![0u8; len];

        let mut reader = file;
        reader
            .seek(SeekFrom::Start(chunk.start))
            .and_then(|_| reader.read_exact(&mut buffer))
            .map_err(|e| mapping_error(chunk, e))?;

        Ok(Self {
            backing: Backing::Buffered(buffer),
            skip: 0,
            len,
        })
    }

    /// The logical bytes `[start, end)`.
    pub fn bytes(&self) -> &[u8] {
        &self.backing[self.skip..self.skip + self.len]
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

fn mapping_error(chunk: Chunk, source: std::io::Error) -> ProcessingError {
    ProcessingError::Mapping {
        start: chunk.start,
        end: chunk.end,
        source,
    }
}

pub fn align_down(offset: u64, granularity: u64) -> u64 {
    offset - offset % granularity
}

/// Alignment a mapping offset must satisfy on this platform.
#[cfg(unix)]
pub fn allocation_granularity() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size > 0 {
        page_size as u64
    } else {
        FALLBACK_ALLOCATION_GRANULARITY
    }
}

#[cfg(not(unix))]
pub fn allocation_granularity() -> u64 {
    FALLBACK_ALLOCATION_GRANULARITY
}
