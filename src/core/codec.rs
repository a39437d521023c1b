//! Binary encoding of the entry list.
//!
//! # Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Record count (8B, u64)                   │
//! ├──────────────────────────────────────────┤
//! │ Record × count:                          │
//! │   - Path length (4B, u32)                │
//! │   - Path bytes (UTF-8, variable)         │
//! │   - Last visit (8B, i64 epoch seconds)   │
//! │   - Score (8B, f64)                      │
//! └──────────────────────────────────────────┘
//! ```
//!
//! A zero-length blob is accepted as an empty list so that a freshly created
//! store file needs no header.

use crate::core::entry::Entry;
use crate::core::error::GozelleError;
use thiserror::Error;

const COUNT_LEN: usize = 8;
const PATH_LEN_LEN: usize = 4;
/// Smallest possible encoded record: empty path, timestamp, score.
const MIN_RECORD_LEN: usize = PATH_LEN_LEN + 8 + 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("truncated at byte {offset}: needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },
    #[error("record {record} has a path that is not valid UTF-8")]
    InvalidUtf8 { record: usize },
    #[error("record {record} has invalid score {score}")]
    InvalidScore { record: usize, score: f64 },
    #[error("{count} trailing bytes after the last record")]
    TrailingBytes { count: usize },
}

pub fn encode(entries: &[Entry]) -> Result<Vec<u8>, GozelleError> {
    let body: usize = entries
        .iter()
        .map(|e| MIN_RECORD_LEN + e.path.len())
        .sum();
    let mut out = Vec::with_capacity(COUNT_LEN + body);
    out.extend_from_slice(&(entries.len() as u64).to_le_bytes());
    for entry in entries {
        let path_len = u32::try_from(entry.path.len()).map_err(|_| {
            GozelleError::Encode(format!(
                "path of {} bytes exceeds the record limit",
                entry.path.len()
            ))
        })?;
        out.extend_from_slice(&path_len.to_le_bytes());
        out.extend_from_slice(entry.path.as_bytes());
        out.extend_from_slice(&entry.last_visit.to_le_bytes());
        out.extend_from_slice(&entry.score.to_le_bytes());
    }
    Ok(out)
}

/// Decodes a blob produced by [`encode`]. Never returns a partial list.
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader { bytes, offset: 0 };
    let count = u64::from_le_bytes(reader.take_array()?);

    // A corrupt count must not drive a huge allocation.
    let plausible = reader.remaining() / MIN_RECORD_LEN;
    let capacity = usize::try_from(count).unwrap_or(usize::MAX).min(plausible);
    let mut entries = Vec::with_capacity(capacity);

    for record in 0..count {
        let record = usize::try_from(record).unwrap_or(usize::MAX);
        let path_len = u32::from_le_bytes(reader.take_array()?) as usize;
        let path = std::str::from_utf8(reader.take(path_len)?)
            .map_err(|_| DecodeError::InvalidUtf8 { record })?
            .to_string();
        let last_visit = i64::from_le_bytes(reader.take_array()?);
        let score = f64::from_le_bytes(reader.take_array()?);
        if !score.is_finite() || score < 0.0 {
            return Err(DecodeError::InvalidScore { record, score });
        }
        entries.push(Entry {
            path,
            last_visit,
            score,
        });
    }

    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes {
            count: reader.remaining(),
        });
    }
    Ok(entries)
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }
}
