// crates/core/src/tail.rs
//! Bounded trailing-window reads over the MME log.
//!
//! The log grows for days between rotations; a status query only ever needs
//! the last couple thousand lines, so the file is read backwards in chunks
//! from EOF and never fully loaded.

use std::io;
use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Chunk size for backward reading: 16KB.
const CHUNK_SIZE: u64 = 16 * 1024;

/// Read the last `n` lines of `path`, oldest first.
///
/// The log is UTF-8 best effort — Open5GS occasionally emits raw protocol
/// bytes into hexdump lines, so decoding is lossy rather than strict.
///
/// Edge cases:
/// - `n == 0` and an empty file both return an empty vec
/// - A file with fewer than `n` lines returns all of them
/// - A trailing newline at EOF does not produce an empty last line
/// - Lines longer than one chunk are reassembled across chunk boundaries
pub async fn tail_lines(path: &Path, n: usize) -> io::Result<Vec<String>> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut file = tokio::fs::File::open(path).await?;
    let file_len = file.metadata().await?.len();
    if file_len == 0 {
        return Ok(Vec::new());
    }

    // Walk from EOF toward BOF, one chunk at a time, until enough newlines
    // have been seen. `n + 1` newlines guarantee `n` complete lines even
    // when the file ends with a newline.
    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut newlines = 0usize;
    let mut read_from = file_len;

    while read_from > 0 && newlines <= n {
        let chunk_len = read_from.min(CHUNK_SIZE);
        read_from -= chunk_len;

        file.seek(io::SeekFrom::Start(read_from)).await?;
        let mut buf = vec![0u8; chunk_len as usize];
        file.read_exact(&mut buf).await?;

        newlines += buf.iter().filter(|&&b| b == b'\n').count();
        chunks.push(buf);
    }

    // Chunks were collected back-to-front; reassemble in file order.
    let mut bytes = Vec::with_capacity(chunks.iter().map(Vec::len).sum());
    for chunk in chunks.into_iter().rev() {
        bytes.extend_from_slice(&chunk);
    }

    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|s| s.to_string()).collect())
}
