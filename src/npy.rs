//! NumPy `.npy` container for 2-D `f64` tables.
//!
//! ## File structure (format version 1.0)
//!
//! - 6 bytes: magic `\x93NUMPY`
//! - 2 bytes: format version `1`, `0`
//! - 2 bytes: header length (little-endian u16)
//! - header: Python dict literal describing dtype, order and shape, padded with
//!   spaces and a trailing newline so the data starts on a 64-byte boundary
//! - data: row-major little-endian `f64` values
//!
//! The rows themselves are owned by the caller; this module only frames them.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// `.npy` magic prefix
const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Magic + version + header length field
const PREAMBLE_SIZE: usize = 6 + 2 + 2;

/// Data section alignment required by NumPy
const ALIGNMENT: usize = 64;

const DESCR: &str = "<f8";

/// A decoded 2-D table
#[derive(Clone, Debug, PartialEq)]
pub struct NpyTable {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Row-major values
    pub data: Vec<f64>,
}

impl NpyTable {
    /// One row of the table, if in range
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        self.data.get(index * self.cols..(index + 1) * self.cols)
    }
}

fn header(rows: usize, cols: usize) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
        DESCR, rows, cols
    );
    let unpadded = PREAMBLE_SIZE + dict.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;

    let mut out = dict.into_bytes();
    out.extend(std::iter::repeat_n(b' ', padding));
    out.push(b'\n');
    out
}

/// Encode a row-major table as `.npy` bytes
pub fn encode_f64_table<const C: usize>(rows: &[[f64; C]]) -> Vec<u8> {
    let header = header(rows.len(), C);
    let mut out = Vec::with_capacity(PREAMBLE_SIZE + header.len() + rows.len() * C * 8);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    // Header is a few dozen bytes, far below u16::MAX
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(&header);
    for row in rows {
        for value in row {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    out
}

/// Write a table to a file that must not exist yet.
///
/// The bytes go to a sibling `{name}.part` file first, which is then hard-linked
/// to `path`. The link fails with [`ErrorKind::AlreadyExists`] instead of
/// overwriting, and `path` never exists with partial content, even when the
/// future is dropped mid-write. A dropped write can leave a stale `.part` file,
/// which the next attempt truncates.
pub async fn write_new<const C: usize>(path: &Path, rows: &[[f64; C]]) -> io::Result<()> {
    let bytes = encode_f64_table(rows);
    let part = part_path(path);

    let published = match write_part(&part, &bytes).await {
        Ok(()) => tokio::fs::hard_link(&part, path).await,
        Err(e) => Err(e),
    };
    tokio::fs::remove_file(&part).await.ok();
    published
}

/// Sibling path holding a table while it is being written
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn write_part(part: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(part)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg.into())
}

/// Decode `.npy` bytes written by [`encode_f64_table`]
///
/// Only little-endian `f64`, C-order, 2-D arrays are accepted.
pub fn decode_f64_table(bytes: &[u8]) -> io::Result<NpyTable> {
    if bytes.len() < PREAMBLE_SIZE || &bytes[..6] != NPY_MAGIC {
        return Err(invalid("missing .npy magic"));
    }
    if bytes[6] != 1 {
        return Err(invalid(format!("unsupported .npy version {}", bytes[6])));
    }
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let data_start = PREAMBLE_SIZE + header_len;
    let header = bytes
        .get(PREAMBLE_SIZE..data_start)
        .ok_or_else(|| invalid("truncated .npy header"))?;
    let header = std::str::from_utf8(header).map_err(|_| invalid("non-UTF-8 .npy header"))?;

    if !header.contains(&format!("'descr': '{}'", DESCR)) {
        return Err(invalid("only '<f8' arrays are supported"));
    }
    if !header.contains("'fortran_order': False") {
        return Err(invalid("only C-order arrays are supported"));
    }
    let (rows, cols) = parse_shape(header).ok_or_else(|| invalid("unreadable shape"))?;

    let data = &bytes[data_start..];
    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(8))
        .ok_or_else(|| invalid("shape overflows"))?;
    if data.len() != expected {
        return Err(invalid(format!(
            "expected {} data bytes, found {}",
            expected,
            data.len()
        )));
    }

    let data = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            f64::from_le_bytes(buf)
        })
        .collect();

    Ok(NpyTable { rows, cols, data })
}

fn parse_shape(header: &str) -> Option<(usize, usize)> {
    let start = header.find("'shape': (")? + "'shape': (".len();
    let end = start + header[start..].find(')')?;
    let mut dims = header[start..end]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().ok());
    let rows = dims.next()??;
    let cols = dims.next()??;
    if dims.next().is_some() {
        return None;
    }
    Some((rows, cols))
}
