//! Transparent decompression of package assets.
//!
//! Assets are stored either raw or gzip-compressed (property database
//! buffers and most pack files), occasionally as bare zlib streams.
//! The format is detected from the leading magic bytes.

use std::borrow::Cow;
use std::io::Read;

use bytes::Bytes;
use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::trace;

use crate::util::{Error, Result};

/// Gzip member header magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Detected stream compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

/// Detect the compression of `data` from its header.
pub fn detect(data: &[u8]) -> Compression {
    if data.len() >= 2 && data[..2] == GZIP_MAGIC {
        return Compression::Gzip;
    }
    // zlib header: CMF 0x78 followed by a FLG byte making (CMF*256 + FLG) % 31 == 0
    if data.len() >= 2 && data[0] == 0x78 && matches!(data[1], 0x01 | 0x5E | 0x9C | 0xDA) {
        return Compression::Zlib;
    }
    Compression::None
}

/// Check if data appears to be compressed.
pub fn is_compressed(data: &[u8]) -> bool {
    detect(data) != Compression::None
}

/// Inflate `data` if it is compressed, otherwise borrow it unchanged.
///
/// The inflated size is capped at `max_len`; a larger stream fails with
/// [`Error::LimitExceeded`] rather than exhausting memory.
pub fn decompress(data: &[u8], max_len: usize) -> Result<Cow<'_, [u8]>> {
    let kind = detect(data);
    let out = match kind {
        Compression::None => return Ok(Cow::Borrowed(data)),
        Compression::Gzip => inflate(GzDecoder::new(data), max_len)?,
        Compression::Zlib => inflate(ZlibDecoder::new(data), max_len)?,
    };
    trace!(?kind, stored = data.len(), inflated = out.len(), "decompressed asset");
    Ok(Cow::Owned(out))
}

/// Owned-buffer variant of [`decompress`]; uncompressed input is returned as is.
pub fn decompress_bytes(data: Bytes, max_len: usize) -> Result<Bytes> {
    let inflated = match decompress(&data, max_len)? {
        Cow::Owned(v) => Some(v),
        Cow::Borrowed(_) => None,
    };
    Ok(inflated.map(Bytes::from).unwrap_or(data))
}

fn inflate(decoder: impl Read, max_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    // Read one byte past the limit to tell "exactly max_len" from "too big".
    let limit = (max_len as u64).saturating_add(1);
    decoder
        .take(limit)
        .read_to_end(&mut out)
        .map_err(Error::Decompression)?;
    if out.len() > max_len {
        return Err(Error::LimitExceeded { what: "inflated asset size", limit: max_len });
    }
    Ok(out)
}
