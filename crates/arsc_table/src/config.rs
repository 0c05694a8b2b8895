//! Device configuration a type chunk applies to.
//!
//! The configuration block starts with its own size, which has grown over the years as
//! qualifiers were added. Only the bytes covered by the declared size are meaningful, any
//! field beyond it reads as zero.

use std::fmt;

use crate::chunk::ChunkReader;
use crate::error::{Error, Result};

/// Borrowed view over a configuration block
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Configuration<'a> {
    raw: &'a [u8],
}

impl<'a> Configuration<'a> {
    const MCC: usize = 4;
    const MNC: usize = 6;
    const LANGUAGE: usize = 8;
    const COUNTRY: usize = 10;
    const ORIENTATION: usize = 12;
    const DENSITY: usize = 14;
    const SDK_VERSION: usize = 24;
    const LOCALE_SCRIPT: usize = 36;
    const LOCALE_VARIANT: usize = 40;

    /// Read the configuration block starting at `offset`
    pub fn parse(reader: &ChunkReader<'a>, offset: usize) -> Result<Self> {
        let size = reader.read_u32(offset)? as usize;
        if size < 4 {
            return Err(Error::malformed(
                reader.origin() + offset,
                format!("configuration size {} is too small", size),
            ));
        }

        Ok(Self {
            raw: reader.slice(offset, size)?,
        })
    }

    /// Declared size of the block
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    fn byte(&self, offset: usize) -> u8 {
        self.raw.get(offset).copied().unwrap_or(0)
    }

    fn u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.byte(offset), self.byte(offset + 1)])
    }

    fn bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        std::array::from_fn(|i| self.byte(offset + i))
    }

    /// Mobile country code
    pub fn mcc(&self) -> u16 {
        self.u16(Self::MCC)
    }

    /// Mobile network code
    pub fn mnc(&self) -> u16 {
        self.u16(Self::MNC)
    }

    /// Packed language code
    pub fn language(&self) -> [u8; 2] {
        self.bytes(Self::LANGUAGE)
    }

    /// Packed region code
    pub fn region(&self) -> [u8; 2] {
        self.bytes(Self::COUNTRY)
    }

    /// Screen orientation qualifier
    pub fn orientation(&self) -> u8 {
        self.byte(Self::ORIENTATION)
    }

    /// Screen density in dpi, 0 if unset
    pub fn density(&self) -> u16 {
        self.u16(Self::DENSITY)
    }

    /// Minimum platform version, 0 if unset
    pub fn sdk_version(&self) -> u16 {
        self.u16(Self::SDK_VERSION)
    }

    /// Four letter script code such as `Latn`, empty if unset
    pub fn script(&self) -> String {
        ascii(&self.bytes::<4>(Self::LOCALE_SCRIPT))
    }

    /// Locale variant such as `POSIX`, empty if unset
    pub fn variant(&self) -> String {
        ascii(&self.bytes::<8>(Self::LOCALE_VARIANT))
    }

    /// Language code such as `en` or `fil`, empty for locale independent configurations
    pub fn language_string(&self) -> String {
        unpack(self.language(), b'a')
    }

    /// Region code such as `US` or `419`, empty if unset
    pub fn region_string(&self) -> String {
        unpack(self.region(), b'0')
    }

    /// Whether every qualifier is unset
    pub fn is_default(&self) -> bool {
        self.raw.iter().skip(4).all(|&b| b == 0)
    }
}

fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Two byte codes are stored as is. Three letter codes are packed into 5 bit groups,
/// flagged by the high bit of the first byte.
fn unpack(packed: [u8; 2], base: u8) -> String {
    let [first, second] = packed;
    if first & 0x80 == 0 {
        return ascii(&packed);
    }

    let letters = [
        second & 0x1F,
        ((second & 0xE0) >> 5) | ((first & 0x03) << 3),
        (first & 0x7C) >> 2,
    ];
    letters.iter().map(|&c| (base + c) as char).collect()
}

impl fmt::Display for Configuration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return write!(f, "default");
        }

        let mut qualifiers = Vec::new();
        if self.mcc() != 0 {
            qualifiers.push(format!("mcc{}", self.mcc()));
        }
        if self.mnc() != 0 {
            qualifiers.push(format!("mnc{}", self.mnc()));
        }

        let language = self.language_string();
        if !language.is_empty() {
            qualifiers.push(language);
        }
        let region = self.region_string();
        if !region.is_empty() {
            qualifiers.push(format!("r{}", region));
        }

        if self.density() != 0 {
            qualifiers.push(format!("{}dpi", self.density()));
        }
        if self.sdk_version() != 0 {
            qualifiers.push(format!("v{}", self.sdk_version()));
        }

        if qualifiers.is_empty() {
            write!(f, "other")
        } else {
            write!(f, "{}", qualifiers.join("-"))
        }
    }
}
