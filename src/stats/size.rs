use flate2::write::GzEncoder;
use flate2::Compression;
use humansize::{format_size as humanize, BINARY};
use std::io::Write;

use super::collector::FileStat;

/// Gzip-encoded length of `bytes` at `level` (0-9).
///
/// The gzip header is written without a modification time or file name, so
/// identical input always yields the same length.
pub fn gzip_size(bytes: &[u8], level: u32) -> std::io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::new(level));
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// Summed sizes over a set of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeTotals {
    pub files: usize,
    pub size: u64,
    pub compressed_size: u64,
}

pub fn totals(files: &[FileStat]) -> SizeTotals {
    files.iter().fold(SizeTotals::default(), |acc, f| SizeTotals {
        files: acc.files + 1,
        size: acc.size + f.size,
        compressed_size: acc.compressed_size + f.compressed_size,
    })
}

/// Format size in human-readable format
pub fn format_size(bytes: u64) -> String {
    humanize(bytes, BINARY)
}
