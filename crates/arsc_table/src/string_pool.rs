//! Decoding of string pool chunks
//!

use byteorder::{ByteOrder, LittleEndian};
use tracing::{instrument, trace};
use widestring::U16Str;

use crate::chunk::{Chunk, ChunkReader, ChunkType};
use crate::error::{Error, Result};
use crate::types::{ChunkHeader, StringPoolHeader};

/// A decoded string pool
///
/// All strings are decoded when the pool is parsed, so lookups never touch the
/// underlying buffer again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    strings: Vec<String>,
    flags: u32,
    style_count: u32,
}

impl StringPool {
    /// Decode the string pool held by `chunk`.
    #[instrument(skip_all, fields(offset = chunk.offset()), err)]
    pub fn parse(chunk: Chunk<'_>) -> Result<StringPool> {
        let chunk = chunk.expect_kind(ChunkType::StringPool)?;
        let reader = chunk.reader();

        if chunk.header_size() < ChunkHeader::SIZE + StringPoolHeader::SIZE {
            return Err(Error::malformed(
                chunk.offset(),
                format!("string pool header of {} bytes is too small", chunk.header_size()),
            ));
        }

        let header = StringPoolHeader::parse(&reader, ChunkHeader::SIZE)?;
        let count = header.string_count as usize;
        let utf8 = header.flags & StringPoolHeader::UTF8 != 0;

        trace!(
            count,
            styles = header.style_count,
            utf8,
            "decoding string pool"
        );

        let offsets = reader.slice(chunk.header_size(), count.saturating_mul(4))?;

        let mut strings = Vec::with_capacity(count);
        if count > 0 {
            let data = Self::string_data(&chunk, &header)?;
            for offset in offsets.chunks_exact(4).map(LittleEndian::read_u32) {
                let offset = offset as usize;
                let string = if utf8 {
                    decode_utf8(&data, offset)?
                } else {
                    decode_utf16(&data, offset)?
                };
                strings.push(string);
            }
        }

        Ok(StringPool {
            strings,
            flags: header.flags,
            style_count: header.style_count,
        })
    }

    /// Region of the chunk holding the string data, ending where the style data begins
    fn string_data<'a>(chunk: &Chunk<'a>, header: &StringPoolHeader) -> Result<ChunkReader<'a>> {
        let start = header.strings_start as usize;
        let end = if header.style_count > 0 && header.styles_start > header.strings_start {
            header.styles_start as usize
        } else {
            chunk.size()
        };

        if start < chunk.header_size() || start > end {
            return Err(Error::malformed(
                chunk.offset(),
                format!("string data offset {:#x} lies outside of the chunk", start),
            ));
        }

        chunk.reader().sub_reader(start, end - start)
    }

    /// Get the string at `index`
    pub fn get(&self, index: u32) -> Result<&str> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.strings.len(),
            })
    }

    /// Number of strings in the pool
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the pool holds no strings
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Whether the strings were stored as UTF-8
    pub fn is_utf8(&self) -> bool {
        self.flags & StringPoolHeader::UTF8 != 0
    }

    /// Whether the pool declares its strings as sorted
    pub fn is_sorted(&self) -> bool {
        self.flags & StringPoolHeader::SORTED != 0
    }

    /// Number of style span arrays declared by the pool. The spans themselves are not decoded.
    pub fn style_count(&self) -> u32 {
        self.style_count
    }

    /// Iterate over the strings in pool order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StringPool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StringPool {
            strings: iter.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Variable length prefix of a UTF-8 entry, returns the value and the bytes it used
fn length_utf8(reader: &ChunkReader<'_>, offset: usize) -> Result<(usize, usize)> {
    let first = reader.read_u8(offset)? as usize;
    if first & 0x80 == 0 {
        return Ok((first, 1));
    }

    let second = reader.read_u8(offset + 1)? as usize;
    Ok((((first & 0x7F) << 8) | second, 2))
}

/// Variable length prefix of a UTF-16 entry, returns the value and the bytes it used
fn length_utf16(reader: &ChunkReader<'_>, offset: usize) -> Result<(usize, usize)> {
    let first = reader.read_u16(offset)? as usize;
    if first & 0x8000 == 0 {
        return Ok((first, 2));
    }

    let second = reader.read_u16(offset + 2)? as usize;
    Ok((((first & 0x7FFF) << 16) | second, 4))
}

fn decode_utf8(reader: &ChunkReader<'_>, offset: usize) -> Result<String> {
    // The character count is only a hint, the byte count decides
    let (_, used_chars) = length_utf8(reader, offset)?;
    let (length, used_bytes) = length_utf8(reader, offset + used_chars)?;
    let start = offset + used_chars + used_bytes;

    let bytes = reader.slice(start, length)?;
    if reader.read_u8(start + length)? != 0 {
        return Err(Error::malformed(
            reader.origin() + offset,
            "UTF-8 string is not NUL terminated",
        ));
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn decode_utf16(reader: &ChunkReader<'_>, offset: usize) -> Result<String> {
    let (length, used) = length_utf16(reader, offset)?;
    let start = offset + used;

    let bytes = reader.slice(start, length.saturating_mul(2))?;
    let mut units = vec![0u16; length];
    LittleEndian::read_u16_into(bytes, &mut units);

    if reader.read_u16(start + bytes.len())? != 0 {
        return Err(Error::malformed(
            reader.origin() + offset,
            "UTF-16 string is not zero terminated",
        ));
    }

    Ok(U16Str::from_slice(&units).to_string_lossy())
}
