//! Decoding of type chunks, the entries of one resource type for one configuration
//!

use byteorder::{ByteOrder, LittleEndian};
use tracing::{instrument, trace};

use crate::chunk::{Chunk, ChunkReader, ChunkType};
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::string_pool::StringPool;
use crate::types::{ChunkHeader, EntryHeader, ResValue, TypeHeader};

/// Slot value of a dense entry table without an entry
pub const NO_ENTRY: u32 = 0xFFFF_FFFF;

/// Slot value of a 16 bit entry table without an entry
pub const NO_ENTRY_16: u16 = 0xFFFF;

/// A resource entry of a type chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position of the entry in the type, the low 16 bits of its resource id
    pub index: u32,

    /// Index into the package's key name pool
    pub key: u32,

    /// Entry flags, see [`EntryHeader`]
    pub flags: u16,

    /// The value of a simple entry, `None` for complex entries
    pub value: Option<ResValue>,
}

impl Entry {
    /// Whether the entry holds a map of values
    pub fn is_complex(&self) -> bool {
        self.flags & EntryHeader::COMPLEX != 0
    }

    /// Whether the entry is part of the package's public API
    pub fn is_public(&self) -> bool {
        self.flags & EntryHeader::PUBLIC != 0
    }
}

/// A decoded type chunk
#[derive(Debug, Clone)]
pub struct TypeChunk<'a> {
    header: TypeHeader,
    type_name: String,
    config: Configuration<'a>,
    entries: Vec<Entry>,
}

impl<'a> TypeChunk<'a> {
    /// Decode the type chunk held by `chunk`, naming it through the package's type pool.
    #[instrument(skip_all, fields(offset = chunk.offset()), err)]
    pub fn parse(chunk: Chunk<'a>, type_pool: &StringPool) -> Result<TypeChunk<'a>> {
        let chunk = chunk.expect_kind(ChunkType::Type)?;
        let reader = chunk.reader();

        let header = TypeHeader::parse(&reader, ChunkHeader::SIZE)?;
        if header.id == 0 {
            return Err(Error::malformed(chunk.offset(), "type id 0 is not valid"));
        }

        let type_name = type_pool.get(header.id as u32 - 1)?.to_owned();
        let config = Configuration::parse(&reader, ChunkHeader::SIZE + TypeHeader::SIZE)?;

        let entries = slots(&reader, chunk.header_size(), &header)?
            .into_iter()
            .map(|(index, offset)| {
                read_entry(&reader, header.entries_start as usize + offset, index)
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(
            type_name = type_name.as_str(),
            %config,
            slots = header.entry_count,
            entries = entries.len(),
            "decoded type chunk"
        );

        Ok(TypeChunk {
            header,
            type_name,
            config,
            entries,
        })
    }

    /// 1-based id of the type within its package
    pub fn id(&self) -> u8 {
        self.header.id
    }

    /// Name of the type such as `string` or `drawable`
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The configuration the entries apply to
    pub fn config(&self) -> &Configuration<'a> {
        &self.config
    }

    /// Language of the configuration, empty for the default configuration
    pub fn language_string(&self) -> String {
        self.config.language_string()
    }

    /// Whether the entry table is stored sparsely
    pub fn is_sparse(&self) -> bool {
        self.header.flags & TypeHeader::SPARSE != 0
    }

    /// Number of slots in the entry table, present or not
    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// The present entries ordered by index
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get the entry in slot `index`, if present
    pub fn get(&self, index: u32) -> Option<&Entry> {
        self.entries
            .binary_search_by_key(&index, |e| e.index)
            .ok()
            .map(|i| &self.entries[i])
    }
}

/// Present slots of the entry table as `(index, offset from entries start)` pairs
fn slots(
    reader: &ChunkReader<'_>,
    table: usize,
    header: &TypeHeader,
) -> Result<Vec<(u32, usize)>> {
    let count = header.entry_count as usize;

    if header.flags & TypeHeader::SPARSE != 0 {
        let raw = reader.slice(table, count.saturating_mul(4))?;
        return Ok(raw
            .chunks_exact(4)
            .map(|slot| {
                let index = LittleEndian::read_u16(&slot[..2]) as u32;
                let offset = LittleEndian::read_u16(&slot[2..]) as usize * 4;
                (index, offset)
            })
            .collect());
    }

    if header.flags & TypeHeader::OFFSET16 != 0 {
        let raw = reader.slice(table, count.saturating_mul(2))?;
        return Ok(raw
            .chunks_exact(2)
            .map(LittleEndian::read_u16)
            .enumerate()
            .filter(|&(_, offset)| offset != NO_ENTRY_16)
            .map(|(index, offset)| (index as u32, offset as usize * 4))
            .collect());
    }

    let raw = reader.slice(table, count.saturating_mul(4))?;
    Ok(raw
        .chunks_exact(4)
        .map(LittleEndian::read_u32)
        .enumerate()
        .filter(|&(_, offset)| offset != NO_ENTRY)
        .map(|(index, offset)| (index as u32, offset as usize))
        .collect())
}

fn read_entry(reader: &ChunkReader<'_>, offset: usize, index: u32) -> Result<Entry> {
    let header = EntryHeader::parse(reader, offset)?;

    if header.flags & EntryHeader::COMPACT != 0 {
        return Ok(Entry {
            index,
            key: header.size as u32,
            flags: header.flags & 0x00FF,
            value: Some(ResValue {
                size: ResValue::SIZE as u16,
                res0: 0,
                data_type: (header.flags >> 8) as u8,
                data: header.key,
            }),
        });
    }

    let value = if header.flags & EntryHeader::COMPLEX != 0 {
        None
    } else {
        Some(ResValue::parse(reader, offset + header.size as usize)?)
    };

    Ok(Entry {
        index,
        key: header.key,
        flags: header.flags,
        value,
    })
}
