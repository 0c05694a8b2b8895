//! Fixed-layout headers of the resource table format.
//!
//! Every structure here starts *after* the 8 byte chunk header unless noted otherwise.
//! All data is stored in little endian format.

use binrw::BinRead;

use crate::chunk::ChunkReader;
use crate::error::Result;

/// Header shared by every chunk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct ChunkHeader {
    /// Type tag of the chunk, see [`crate::chunk::ChunkType`]
    pub kind: u16,

    /// Size of the chunk header, including these 8 bytes
    pub header_size: u16,

    /// Total size of the chunk, including its header
    pub size: u32,
}

/// Header of the top level table chunk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct TableHeader {
    /// The number of package chunks contained in this table
    pub package_count: u32,
}

/// Header of a string pool chunk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct StringPoolHeader {
    /// Number of strings in the pool
    pub string_count: u32,

    /// Number of style span arrays in the pool
    pub style_count: u32,

    /// Combination of [`StringPoolHeader::SORTED`] and [`StringPoolHeader::UTF8`]
    pub flags: u32,

    /// Offset from the start of the chunk to the string data
    pub strings_start: u32,

    /// Offset from the start of the chunk to the style data
    pub styles_start: u32,
}

impl StringPoolHeader {
    /// The strings are sorted by their UTF-16 value
    pub const SORTED: u32 = 0x0001;

    /// The strings are stored as UTF-8 rather than UTF-16
    pub const UTF8: u32 = 0x0100;
}

/// Header of a package chunk
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct PackageHeader {
    /// The package id, `0x7f` for applications
    pub id: u32,

    /// UTF-16 package name, padded with zeroes
    pub name: [u16; 128],

    /// Offset from the start of the chunk to the type name pool
    pub type_strings: u32,

    /// Last type index that is public
    pub last_public_type: u32,

    /// Offset from the start of the chunk to the key name pool
    pub key_strings: u32,

    /// Last key index that is public
    pub last_public_key: u32,
}

impl PackageHeader {
    /// The package name up to its first zero unit
    pub fn name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&unit| unit == 0)
            .unwrap_or(self.name.len());
        String::from_utf16_lossy(&self.name[..end])
    }
}

/// Header of a type chunk, excluding its trailing configuration
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct TypeHeader {
    /// 1-based index into the package's type name pool
    pub id: u8,

    /// Combination of [`TypeHeader::SPARSE`] and [`TypeHeader::OFFSET16`]
    pub flags: u8,

    /// Always zero
    pub reserved: u16,

    /// Number of slots in the entry index table
    pub entry_count: u32,

    /// Offset from the start of the chunk to the entry data
    pub entries_start: u32,
}

impl TypeHeader {
    /// The entry index table holds `(index, offset / 4)` pairs
    pub const SPARSE: u8 = 0x01;

    /// The entry index table holds 16 bit offsets divided by 4
    pub const OFFSET16: u8 = 0x02;
}

/// Header of a single entry in a type chunk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct EntryHeader {
    /// Size of this header, or the key index for compact entries
    pub size: u16,

    /// Entry flags
    pub flags: u16,

    /// Index into the key name pool, or the value data for compact entries
    pub key: u32,
}

impl EntryHeader {
    /// The entry holds a map of values rather than a single value
    pub const COMPLEX: u16 = 0x0001;

    /// The entry is public
    pub const PUBLIC: u16 = 0x0002;

    /// The entry may be overridden by other packages
    pub const WEAK: u16 = 0x0004;

    /// The entry packs key, type and data into the header
    pub const COMPACT: u16 = 0x0008;
}

/// A typed value
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct ResValue {
    /// Size of the value structure
    pub size: u16,

    /// Always zero
    pub res0: u8,

    /// Type of the data word
    pub data_type: u8,

    /// Value data, an index into the global string pool for strings
    pub data: u32,
}

impl ResValue {
    /// Data is a reference to another resource
    pub const TYPE_REFERENCE: u8 = 0x01;

    /// Data is an index into the global string pool
    pub const TYPE_STRING: u8 = 0x03;

    /// Whether this value holds a string pool index
    pub fn is_string(&self) -> bool {
        self.data_type == Self::TYPE_STRING
    }
}

macro_rules! fixed_layout {
    ($($ty:ty => $size:expr),* $(,)?) => {$(
        impl $ty {
            /// Encoded size in bytes
            pub const SIZE: usize = $size;

            pub(crate) fn parse(reader: &ChunkReader<'_>, offset: usize) -> Result<Self> {
                Ok(Self::read(&mut reader.cursor(offset, Self::SIZE)?)?)
            }
        }
    )*};
}

fixed_layout! {
    ChunkHeader => 8,
    TableHeader => 4,
    StringPoolHeader => 20,
    PackageHeader => 4 + 256 + 16,
    TypeHeader => 12,
    EntryHeader => 8,
    ResValue => 8,
}
