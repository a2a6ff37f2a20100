//! Lazy record sequences over a pack file.

use std::fmt;
use std::iter::FusedIterator;

use super::{EntryType, PackFile};
use crate::util::{ByteReader, Result};

/// Decodes the record at `index` from a reader positioned after its type index.
pub type DecodeFn<T> = fn(usize, &EntryType, &mut ByteReader<'_>) -> Result<T>;

/// Forward-only, single-pass sequence of records decoded on demand.
///
/// The sequence is bounded by the pack's declared entry count. It owns the
/// pack buffer, so it can outlive the call that created it. After the first
/// error it yields nothing further; decoding again means calling the decoder
/// again on the same bytes.
pub struct Records<T> {
    pack: PackFile,
    next: usize,
    failed: bool,
    decode: DecodeFn<T>,
}

impl<T> Records<T> {
    /// Create a sequence over all entries of `pack`.
    pub fn new(pack: PackFile, decode: DecodeFn<T>) -> Self {
        Self { pack, next: 0, failed: false, decode }
    }

    /// Total number of records declared by the pack.
    pub fn declared_len(&self) -> usize {
        self.pack.len()
    }

    /// Underlying pack file.
    pub fn pack(&self) -> &PackFile {
        &self.pack
    }
}

impl<T> Iterator for Records<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.pack.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let decode = self.decode;
        let result = self
            .pack
            .entry(index)
            .and_then(|(ty, mut r)| decode(index, ty, &mut r));
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let left = self.pack.len() - self.next;
        (0, Some(left))
    }
}

impl<T> FusedIterator for Records<T> {}

impl<T> fmt::Debug for Records<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("declared_len", &self.pack.len())
            .field("next", &self.next)
            .field("failed", &self.failed)
            .finish()
    }
}
