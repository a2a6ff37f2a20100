//! Pack container reader.

use bytes::Bytes;
use tracing::debug;

use super::format::*;
use crate::core::{compression, DecodeLimits};
use crate::util::{ByteReader, Error, Result};

/// Entry type descriptor from the pack's type table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryType {
    /// Entry class, selects the record decoder.
    pub class: String,
    /// Entry type name.
    pub ty: String,
    /// Record layout version.
    pub version: u32,
}

/// A validated pack file.
///
/// Holds the (decompressed) buffer, the table of contents and the type table.
/// Entries are decoded on demand through [`PackFile::entry`].
#[derive(Clone, Debug)]
pub struct PackFile {
    buf: Bytes,
    header_type: String,
    version: i32,
    toc: Vec<u32>,
    types: Vec<EntryType>,
    /// Sorted entry starts and table offsets; an entry ends at the next one.
    boundaries: Vec<usize>,
}

impl PackFile {
    /// Decompress if needed and validate header, footer, TOC and type table.
    pub fn parse(data: Bytes, limits: &DecodeLimits) -> Result<Self> {
        let buf = compression::decompress_bytes(data, limits.max_inflated_len)?;

        if buf.len() < MIN_PACK_SIZE {
            return Err(Error::TruncatedBuffer {
                what: "pack file",
                offset: 0,
                needed: MIN_PACK_SIZE,
                len: buf.len(),
            });
        }
        let body_end = buf.len() - FOOTER_SIZE;

        let mut r = ByteReader::new(&buf[..body_end], "pack header");
        let header_type = r.read_string()?;
        let version = r.read_i32()?;
        check_version("pack file", version, &SUPPORTED_PACK_VERSIONS)?;
        let header_end = r.pos();

        let mut footer = ByteReader::at(&buf, body_end, "pack footer")?;
        let toc_offset = footer.read_u32()? as usize;
        let types_offset = footer.read_u32()? as usize;

        let toc = Self::read_toc(&buf[..body_end], toc_offset, header_end, limits)?;
        let types = Self::read_types(&buf[..body_end], types_offset, limits)?;

        let mut boundaries: Vec<usize> = toc.iter().map(|&o| o as usize).collect();
        boundaries.extend([toc_offset, types_offset, body_end]);
        boundaries.sort_unstable();
        boundaries.dedup();

        debug!(
            header_type = %header_type,
            version,
            entries = toc.len(),
            types = types.len(),
            "parsed pack file"
        );

        Ok(Self { buf, header_type, version, toc, types, boundaries })
    }

    fn read_toc(body: &[u8], offset: usize, header_end: usize, limits: &DecodeLimits) -> Result<Vec<u32>> {
        let mut r = ByteReader::at(body, offset, "pack table of contents")?;
        let count = r.read_varint()? as usize;
        if count > limits.max_record_count {
            return Err(Error::LimitExceeded { what: "pack entry count", limit: limits.max_record_count });
        }
        let toc = r.read_u32_vec(count)?;
        for (i, &entry) in toc.iter().enumerate() {
            let entry = entry as usize;
            if entry < header_end || entry >= body.len() {
                debug!(index = i, offset = entry, "entry offset outside pack body");
                return Err(Error::TruncatedBuffer {
                    what: "pack entry",
                    offset: entry,
                    needed: 1,
                    len: body.len(),
                });
            }
        }
        Ok(toc)
    }

    fn read_types(body: &[u8], offset: usize, limits: &DecodeLimits) -> Result<Vec<EntryType>> {
        let mut r = ByteReader::at(body, offset, "pack type table")?;
        let count = r.read_varint()? as usize;
        if count > limits.max_record_count {
            return Err(Error::LimitExceeded { what: "pack type count", limit: limits.max_record_count });
        }
        // Each type takes at least three bytes: two empty strings and a version.
        r.ensure(count, 3)?;
        let mut types = Vec::with_capacity(count);
        for _ in 0..count {
            let class = r.read_string()?;
            let ty = r.read_string()?;
            let version = r.read_varint()?;
            types.push(EntryType { class, ty, version });
        }
        Ok(types)
    }

    /// Header type string.
    #[inline]
    pub fn header_type(&self) -> &str {
        &self.header_type
    }

    /// Container version.
    #[inline]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Number of entries declared by the table of contents.
    #[inline]
    pub fn len(&self) -> usize {
        self.toc.len()
    }

    /// Check if the pack has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.toc.is_empty()
    }

    /// Entry type table.
    #[inline]
    pub fn types(&self) -> &[EntryType] {
        &self.types
    }

    /// Seek to entry `index`, returning its type and a reader over its body.
    ///
    /// The reader ends where the next entry or table begins, so a short record
    /// reports truncation instead of reading into its neighbour.
    pub fn entry(&self, index: usize) -> Result<(&EntryType, ByteReader<'_>)> {
        let offset = *self.toc.get(index).ok_or_else(|| {
            Error::invalid(format!("entry {} out of bounds (count: {})", index, self.toc.len()))
        })? as usize;
        let body_end = self.buf.len() - FOOTER_SIZE;
        let next = self.boundaries.partition_point(|&b| b <= offset);
        let end = self.boundaries.get(next).copied().unwrap_or(body_end);
        let mut r = ByteReader::at(&self.buf[..end], offset, "pack entry")?;
        let type_index = r.read_varint()? as usize;
        let ty = self.types.get(type_index).ok_or_else(|| {
            Error::invalid(format!(
                "entry {} references type {} (types: {})",
                index,
                type_index,
                self.types.len()
            ))
        })?;
        Ok((ty, r))
    }
}
