//! This library decodes compiled Android resource tables and extracts their **string** resources.
//!
//! # Resource Table Format Documentation
//!
//! A resource table (`resources.arsc`) is a stream of nested, length prefixed chunks. Every chunk
//! starts with the same 8 byte header, followed by a type specific header and its payload.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Type                   | 2 bytes: Identifies the kind of chunk                      |
//! | 0x0002         | Header Size            | 2 bytes: Size of the chunk header including these 8 bytes  |
//! | 0x0004         | Size                   | 4 bytes: Total size of the chunk including its header      |
//!
//! The next sibling chunk always starts at the current chunk's offset plus its total size,
//! regardless of how much of the payload was understood.
//!
//! ## Chunk Layout
//!
//! ```text
//! Table (0x0002)
//! ├── String Pool (0x0001)          global pool holding every string value
//! └── Package (0x0200)              one per package, usually exactly one
//!     ├── String Pool (0x0001)      type names: "attr", "string", ...
//!     ├── String Pool (0x0001)      key names: "app_name", ...
//!     ├── Type Spec (0x0202)        per type flags, no values
//!     └── Type (0x0201)             the entries of one type for one configuration
//! ```
//!
//! ### String Pool
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0008         | String Count           | 4 bytes: Number of strings                              |
//! | 0x000C         | Style Count            | 4 bytes: Number of style span arrays                    |
//! | 0x0010         | Flags                  | 4 bytes: `0x001` sorted, `0x100` UTF-8                  |
//! | 0x0014         | Strings Start          | 4 bytes: Offset of the string data from the chunk start |
//! | 0x0018         | Styles Start           | 4 bytes: Offset of the style data from the chunk start  |
//!
//! The header is followed by one 4 byte offset per string, relative to the string data.
//! UTF-8 strings are prefixed by their character and byte lengths, UTF-16 strings by their
//! unit count. A length whose high bit is set continues into a second byte (or unit).
//! Every string is terminated by a zero byte (or unit).
//!
//! ### Package
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0008         | ID                     | 4 bytes: Package id, `0x7f` for applications            |
//! | 0x000C         | Name                   | 256 bytes: UTF-16 name padded with zeroes               |
//! | 0x010C         | Type Strings           | 4 bytes: Offset of the type name pool                   |
//! | 0x0110         | Last Public Type       | 4 bytes                                                 |
//! | 0x0114         | Key Strings            | 4 bytes: Offset of the key name pool                    |
//! | 0x0118         | Last Public Key        | 4 bytes                                                 |
//!
//! ### Type
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0008         | ID                     | 1 byte: 1-based index into the type name pool           |
//! | 0x0009         | Flags                  | 1 byte: `0x01` sparse, `0x02` 16 bit offsets            |
//! | 0x000A         | Reserved               | 2 bytes                                                 |
//! | 0x000C         | Entry Count            | 4 bytes: Number of slots in the entry table             |
//! | 0x0010         | Entries Start          | 4 bytes: Offset of the entry data from the chunk start  |
//! | 0x0014         | Configuration          | Variable: starts with its own 4 byte size               |
//!
//! The entry table follows the header. Each slot holds the offset of an entry relative to
//! the entry data, with `0xFFFFFFFF` marking an empty slot. An entry is an 8 byte header
//! (size, flags, key name index) followed by an 8 byte value (size, reserved, type, data)
//! unless it is complex.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.arsc`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod package;
pub mod string_pool;
pub mod table;
pub mod type_chunk;
pub mod types;

pub use extract::{ExtractOptions, StringExtractor, StringTable};
pub use table::ResourceTable;
