//! Binary codec
//!
//! Primitive reads and writes of fixed-width integers and fixed/variable
//! length byte strings against a stream.
//!
//! ## Conventions
//!
//! - All integers are written in **native byte order** with no alignment
//!   translation. Writer and reader must run on platforms agreeing on
//!   byte order; the format is not portable across byte orders (documented
//!   limitation, not fixed by this design).
//! - Integer reads treat end of data as a normal signal and return `None`
//!   rather than failing: a scan discovers the end of a store by failing
//!   to read the next record's first byte. The *caller* decides whether a
//!   `None` is a clean boundary or a truncated record.
//! - Exact-length string reads fail with [`TransitError::Truncated`] when
//!   the stream yields fewer bytes than requested: a string is only ever
//!   read inside a record, where short data means truncation.

use std::io::{self, Read, Write};

use crate::error::{Result, TransitError};

// =============================================================================
// Integer primitives
// =============================================================================

/// Write a single byte.
pub fn write_u8<W: Write>(w: &mut W, value: u8) -> Result<()> {
    w.write_all(&[value])?;
    Ok(())
}

/// Read a single byte; `None` at end of data.
pub fn read_u8<R: Read>(r: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    match r.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf[0])),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a 4-byte signed integer in native byte order.
pub fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<()> {
    w.write_all(&value.to_ne_bytes())?;
    Ok(())
}

/// Read a 4-byte signed integer; `None` when the stream is exhausted.
pub fn read_i32<R: Read>(r: &mut R) -> Result<Option<i32>> {
    let mut buf = [0u8; 4];
    match r.read_exact(&mut buf) {
        Ok(()) => Ok(Some(i32::from_ne_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write an 8-byte signed integer (byte offsets) in native byte order.
pub fn write_i64<W: Write>(w: &mut W, value: i64) -> Result<()> {
    w.write_all(&value.to_ne_bytes())?;
    Ok(())
}

/// Read an 8-byte signed integer; `None` when the stream is exhausted.
pub fn read_i64<R: Read>(r: &mut R) -> Result<Option<i64>> {
    let mut buf = [0u8; 8];
    match r.read_exact(&mut buf) {
        Ok(()) => Ok(Some(i64::from_ne_bytes(buf))),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// String primitives
// =============================================================================

/// Write exactly `bytes.len()` bytes.
pub fn write_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
    w.write_all(bytes)?;
    Ok(())
}

/// Read exactly `len` bytes; fails with `Truncated` on a short read.
pub fn read_bytes<R: Read>(r: &mut R, len: usize, context: &'static str) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)
        .map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => TransitError::Truncated(context),
            _ => TransitError::Io(e),
        })?;
    Ok(buf)
}

/// Write `text` into a fixed-width slot, truncating or zero-padding.
pub fn write_fixed_text<W: Write>(w: &mut W, text: &str, width: usize) -> Result<()> {
    let mut slot = vec![0u8; width];
    let bytes = text.as_bytes();
    let n = bytes.len().min(width);
    slot[..n].copy_from_slice(&bytes[..n]);
    w.write_all(&slot)?;
    Ok(())
}

/// Read a fixed-width text slot, dropping trailing zero padding.
pub fn read_fixed_text<R: Read>(r: &mut R, width: usize, context: &'static str) -> Result<String> {
    let raw = read_bytes(r, width, context)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}

/// Read a length-prefixed variable string; `None` when the stream ends
/// exactly at the length field.
pub fn read_var_text<R: Read>(r: &mut R, context: &'static str) -> Result<Option<String>> {
    let len = match read_i32(r)? {
        Some(len) => len,
        None => return Ok(None),
    };
    let raw = read_bytes(r, len.max(0) as usize, context)?;
    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

/// Write a variable string as (length, bytes).
pub fn write_var_text<W: Write>(w: &mut W, text: &str) -> Result<()> {
    write_i32(w, text.len() as i32)?;
    w.write_all(text.as_bytes())?;
    Ok(())
}
