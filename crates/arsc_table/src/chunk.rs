//! Bounds checked access to the chunk stream.
//!

use byteorder::{ByteOrder, LittleEndian};
use derive_more::derive::Display;
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::types::ChunkHeader;

/// Identifies what a chunk holds
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChunkType {
    #[display("null")]
    Null,
    #[display("string pool")]
    StringPool,
    #[display("table")]
    Table,
    #[display("xml")]
    Xml,
    #[display("package")]
    Package,
    #[display("type")]
    Type,
    #[display("type spec")]
    TypeSpec,
    #[display("library")]
    Library,
    #[display("overlayable")]
    Overlayable,
    #[display("overlayable policy")]
    OverlayablePolicy,
    #[display("staged alias")]
    StagedAlias,
    #[display("unknown ({_0:#06x})")]
    Unknown(u16),
}

impl From<u16> for ChunkType {
    fn from(value: u16) -> Self {
        match value {
            0x0000 => ChunkType::Null,
            0x0001 => ChunkType::StringPool,
            0x0002 => ChunkType::Table,
            0x0003 => ChunkType::Xml,
            0x0200 => ChunkType::Package,
            0x0201 => ChunkType::Type,
            0x0202 => ChunkType::TypeSpec,
            0x0203 => ChunkType::Library,
            0x0204 => ChunkType::Overlayable,
            0x0205 => ChunkType::OverlayablePolicy,
            0x0206 => ChunkType::StagedAlias,
            other => ChunkType::Unknown(other),
        }
    }
}

/// Little endian reader over a byte buffer
///
/// Offsets passed to the reader are relative to the start of its buffer. Errors report
/// them relative to the start of the file, using the origin the reader was created with.
#[derive(Debug, Copy, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    origin: usize,
}

impl<'a> ChunkReader<'a> {
    /// Reader over a whole file
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_origin(data, 0)
    }

    /// Reader over a part of a file which starts at `origin`
    pub fn with_origin(data: &'a [u8], origin: usize) -> Self {
        Self { data, origin }
    }

    /// The underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Position of the buffer in the file
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Length of the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn bytes(&self, offset: usize, needed: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(needed)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(Error::TruncatedInput {
                offset: self.origin.saturating_add(offset),
                needed,
                available: self.data.len().saturating_sub(offset),
            })
    }

    /// Read a byte
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes(offset, 1)?[0])
    }

    /// Read a little endian `u16`
    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.bytes(offset, 2)?))
    }

    /// Read a little endian `u32`
    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.bytes(offset, 4)?))
    }

    /// Borrow `length` bytes starting at `offset`
    pub fn slice(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(length)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(Error::OutOfBounds {
                offset: self.origin.saturating_add(offset),
                length,
                len: self.data.len(),
            })
    }

    /// Reader over `length` bytes starting at `offset`
    pub fn sub_reader(&self, offset: usize, length: usize) -> Result<ChunkReader<'a>> {
        Ok(Self::with_origin(
            self.slice(offset, length)?,
            self.origin + offset,
        ))
    }

    pub(crate) fn cursor(&self, offset: usize, length: usize) -> Result<Cursor<&'a [u8]>> {
        Ok(Cursor::new(self.bytes(offset, length)?))
    }

    /// Read the 8 byte header of the chunk at `offset`
    pub fn read_chunk_header(&self, offset: usize) -> Result<ChunkHeader> {
        ChunkHeader::parse(self, offset)
    }

    /// Read the chunk at `offset`, validating that it fits in this buffer
    pub fn chunk(&self, offset: usize) -> Result<Chunk<'a>> {
        let header = self.read_chunk_header(offset)?;
        let position = self.origin + offset;
        let remaining = self.data.len() - offset;

        if (header.header_size as usize) < ChunkHeader::SIZE {
            return Err(Error::malformed(
                position,
                format!("header size {} is smaller than a chunk header", header.header_size),
            ));
        }

        if header.header_size as u32 > header.size {
            return Err(Error::malformed(
                position,
                format!(
                    "header size {} exceeds chunk size {}",
                    header.header_size, header.size
                ),
            ));
        }

        if header.size as usize > remaining {
            return Err(Error::malformed(
                position,
                format!(
                    "chunk size {} exceeds the {} bytes remaining",
                    header.size, remaining
                ),
            ));
        }

        Ok(Chunk {
            header,
            reader: self.sub_reader(offset, header.size as usize)?,
        })
    }

    /// Iterate over the sibling chunks found from `start` to the end of this buffer
    pub fn children(&self, start: usize) -> ChunkIter<'a> {
        ChunkIter {
            reader: *self,
            offset: start,
            failed: false,
        }
    }
}

/// A single chunk and its payload
#[derive(Debug, Copy, Clone)]
pub struct Chunk<'a> {
    header: ChunkHeader,
    reader: ChunkReader<'a>,
}

impl<'a> Chunk<'a> {
    /// What this chunk holds
    pub fn kind(&self) -> ChunkType {
        self.header.kind.into()
    }

    /// The raw chunk header
    pub fn header(&self) -> ChunkHeader {
        self.header
    }

    /// Size of the chunk header
    pub fn header_size(&self) -> usize {
        self.header.header_size as usize
    }

    /// Total size of the chunk
    pub fn size(&self) -> usize {
        self.header.size as usize
    }

    /// Position of the chunk in the file
    pub fn offset(&self) -> usize {
        self.reader.origin()
    }

    /// Reader over the whole chunk, header included
    pub fn reader(&self) -> ChunkReader<'a> {
        self.reader
    }

    /// Iterate over the chunks nested in this chunk's payload
    pub fn children(&self) -> ChunkIter<'a> {
        self.reader.children(self.header_size())
    }

    pub(crate) fn expect_kind(self, kind: ChunkType) -> Result<Self> {
        if self.kind() != kind {
            return Err(Error::malformed(
                self.offset(),
                format!("expected a {} chunk, found a {} chunk", kind, self.kind()),
            ));
        }
        Ok(self)
    }
}

/// Iterator over consecutive chunks
///
/// Each chunk is found at the previous chunk's offset plus its total size. Iteration ends
/// at the end of the buffer or after the first error.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    reader: ChunkReader<'a>,
    offset: usize,
    failed: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.reader.len() {
            return None;
        }

        match self.reader.chunk(self.offset) {
            Ok(chunk) => {
                self.offset += chunk.size();
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for ChunkIter<'_> {}
