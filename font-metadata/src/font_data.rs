//! raw font bytes

use std::ops::{Bound, Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Used for structures whose fields have variable size, such as the WOFF2
/// table directory.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        if let (Bound::Included(start), Bound::Excluded(end)) = bounds {
            if start > end {
                return None;
            }
        }
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Returns the `len` bytes starting at `offset`, checking for overflow.
    pub fn slice_len(&self, offset: usize, len: usize) -> Option<FontData<'a>> {
        self.slice(offset..offset.checked_add(len)?)
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        offset
            .checked_add(T::RAW_BYTE_LEN)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interpret the bytes in `range` as an array of fixed-size records.
    pub fn read_array<T: AnyBitPattern>(&self, range: Range<usize>) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl Cursor<'_> {
    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance_by(T::RAW_BYTE_LEN);
        temp
    }

    /// The current position of the cursor, from the start of its data.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}
