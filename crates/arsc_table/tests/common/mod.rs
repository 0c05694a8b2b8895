//! Builders for small resource tables laid out the way aapt2 writes them
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

pub const TABLE: u16 = 0x0002;
pub const STRING_POOL: u16 = 0x0001;
pub const PACKAGE: u16 = 0x0200;
pub const TYPE: u16 = 0x0201;
pub const TYPE_SPEC: u16 = 0x0202;
pub const LIBRARY: u16 = 0x0203;

/// Frame `header` and `body` as a chunk of `kind`
pub fn chunk(kind: u16, header: &[u8], body: &[u8]) -> Vec<u8> {
    let header_size = 8 + header.len();
    let size = header_size + body.len();

    let mut out = Vec::with_capacity(size);
    out.write_u16::<LittleEndian>(kind).unwrap();
    out.write_u16::<LittleEndian>(header_size as u16).unwrap();
    out.write_u32::<LittleEndian>(size as u32).unwrap();
    out.extend_from_slice(header);
    out.extend_from_slice(body);
    out
}

fn write_length_utf8(out: &mut Vec<u8>, length: usize) {
    if length > 0x7F {
        out.push(((length >> 8) as u8) | 0x80);
    }
    out.push(length as u8);
}

pub fn string_pool(strings: &[&str], utf8: bool) -> Vec<u8> {
    styled_string_pool(strings, utf8, 0)
}

/// A pool with `styles` empty span lists following the string data
pub fn styled_string_pool(strings: &[&str], utf8: bool, styles: usize) -> Vec<u8> {
    let mut offsets = Vec::new();
    let mut data = Vec::new();

    for s in strings {
        offsets.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        if utf8 {
            write_length_utf8(&mut data, s.encode_utf16().count());
            write_length_utf8(&mut data, s.len());
            data.extend_from_slice(s.as_bytes());
            data.push(0);
        } else {
            let units = s.encode_utf16().collect::<Vec<_>>();
            if units.len() > 0x7FFF {
                data.write_u16::<LittleEndian>(((units.len() >> 16) as u16) | 0x8000)
                    .unwrap();
            }
            data.write_u16::<LittleEndian>(units.len() as u16).unwrap();
            for unit in units {
                data.write_u16::<LittleEndian>(unit).unwrap();
            }
            data.write_u16::<LittleEndian>(0).unwrap();
        }
    }
    while data.len() % 4 != 0 {
        data.push(0);
    }

    // Each span list holds only its end marker, two more close the style data
    let mut style_offsets = Vec::new();
    let mut style_data = Vec::new();
    for _ in 0..styles {
        style_offsets
            .write_u32::<LittleEndian>(style_data.len() as u32)
            .unwrap();
        style_data.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
    }
    if styles > 0 {
        style_data.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
        style_data.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
    }

    let strings_start = 28 + (offsets.len() + style_offsets.len()) as u32;
    let styles_start = if styles > 0 {
        strings_start + data.len() as u32
    } else {
        0
    };

    let mut header = Vec::new();
    header.write_u32::<LittleEndian>(strings.len() as u32).unwrap();
    header.write_u32::<LittleEndian>(styles as u32).unwrap();
    header
        .write_u32::<LittleEndian>(if utf8 { 0x100 } else { 0 })
        .unwrap();
    header.write_u32::<LittleEndian>(strings_start).unwrap();
    header.write_u32::<LittleEndian>(styles_start).unwrap();

    let mut body = offsets;
    body.extend_from_slice(&style_offsets);
    body.extend_from_slice(&data);
    body.extend_from_slice(&style_data);
    chunk(STRING_POOL, &header, &body)
}

pub fn type_spec(id: u8, entry_count: u32) -> Vec<u8> {
    let mut header = vec![id, 0, 0, 0];
    header.write_u32::<LittleEndian>(entry_count).unwrap();
    chunk(TYPE_SPEC, &header, &vec![0u8; entry_count as usize * 4])
}

pub enum Slot {
    Missing,
    Value { key: u32, data_type: u8, data: u32 },
    Complex { key: u32 },
}

/// A type chunk with a dense entry table
pub struct TypeChunk {
    id: u8,
    language: [u8; 2],
    region: [u8; 2],
    slots: Vec<Slot>,
}

impl TypeChunk {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            language: [0; 2],
            region: [0; 2],
            slots: Vec::new(),
        }
    }

    pub fn language(mut self, code: &str) -> Self {
        self.language.copy_from_slice(code.as_bytes());
        self
    }

    pub fn region(mut self, code: &str) -> Self {
        self.region.copy_from_slice(code.as_bytes());
        self
    }

    /// An entry whose value is the string at `value` in the global pool
    pub fn string(self, key: u32, value: u32) -> Self {
        self.value(key, 0x03, value)
    }

    pub fn value(mut self, key: u32, data_type: u8, data: u32) -> Self {
        self.slots.push(Slot::Value {
            key,
            data_type,
            data,
        });
        self
    }

    pub fn complex(mut self, key: u32) -> Self {
        self.slots.push(Slot::Complex { key });
        self
    }

    pub fn missing(mut self) -> Self {
        self.slots.push(Slot::Missing);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut config = vec![0u8; 64];
        config[..4].copy_from_slice(&64u32.to_le_bytes());
        config[8..10].copy_from_slice(&self.language);
        config[10..12].copy_from_slice(&self.region);

        let mut table = Vec::new();
        let mut entries = Vec::new();
        for slot in &self.slots {
            let offset = entries.len() as u32;
            match slot {
                Slot::Missing => {
                    table.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                    continue;
                }
                Slot::Value {
                    key,
                    data_type,
                    data,
                } => {
                    entries.write_u16::<LittleEndian>(8).unwrap();
                    entries.write_u16::<LittleEndian>(0).unwrap();
                    entries.write_u32::<LittleEndian>(*key).unwrap();
                    entries.write_u16::<LittleEndian>(8).unwrap();
                    entries.push(0);
                    entries.push(*data_type);
                    entries.write_u32::<LittleEndian>(*data).unwrap();
                }
                Slot::Complex { key } => {
                    entries.write_u16::<LittleEndian>(16).unwrap();
                    entries.write_u16::<LittleEndian>(0x0001).unwrap();
                    entries.write_u32::<LittleEndian>(*key).unwrap();
                    // Parent and map count
                    entries.write_u32::<LittleEndian>(0).unwrap();
                    entries.write_u32::<LittleEndian>(0).unwrap();
                }
            }
            table.write_u32::<LittleEndian>(offset).unwrap();
        }

        let header_size = 8 + 12 + config.len();
        let mut header = vec![self.id, 0, 0, 0];
        header
            .write_u32::<LittleEndian>(self.slots.len() as u32)
            .unwrap();
        header
            .write_u32::<LittleEndian>((header_size + table.len()) as u32)
            .unwrap();
        header.extend_from_slice(&config);

        let mut body = table;
        body.extend_from_slice(&entries);
        chunk(TYPE, &header, &body)
    }
}

pub struct Package {
    id: u32,
    name: String,
    types: Vec<String>,
    keys: Vec<String>,
    children: Vec<Vec<u8>>,
}

impl Package {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            types: vec!["attr".into(), "string".into()],
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn chunk(mut self, chunk: Vec<u8>) -> Self {
        self.children.push(chunk);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let types = string_pool(
            &self.types.iter().map(String::as_str).collect::<Vec<_>>(),
            false,
        );
        let keys = string_pool(
            &self.keys.iter().map(String::as_str).collect::<Vec<_>>(),
            true,
        );

        let header_size = 288u32;
        let mut header = Vec::new();
        header.write_u32::<LittleEndian>(self.id).unwrap();
        for unit in self
            .name
            .encode_utf16()
            .chain(std::iter::repeat(0))
            .take(128)
        {
            header.write_u16::<LittleEndian>(unit).unwrap();
        }
        header.write_u32::<LittleEndian>(header_size).unwrap();
        header.write_u32::<LittleEndian>(0).unwrap();
        header
            .write_u32::<LittleEndian>(header_size + types.len() as u32)
            .unwrap();
        header.write_u32::<LittleEndian>(0).unwrap();
        // Type id offset
        header.write_u32::<LittleEndian>(0).unwrap();

        let mut body = types;
        body.extend_from_slice(&keys);
        for child in &self.children {
            body.extend_from_slice(child);
        }
        chunk(PACKAGE, &header, &body)
    }
}

/// The top level table, children are written in the order they are added
#[derive(Default)]
pub struct Table {
    children: Vec<Vec<u8>>,
    packages: u32,
    package_count: Option<u32>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a UTF-8 global string pool
    pub fn values(self, strings: &[&str]) -> Self {
        self.chunk(string_pool(strings, true))
    }

    /// Add a UTF-8 global string pool whose first `styles` strings carry style spans
    pub fn values_styled(self, strings: &[&str], styles: usize) -> Self {
        self.chunk(styled_string_pool(strings, true, styles))
    }

    /// Add a UTF-16 global string pool
    pub fn values_utf16(self, strings: &[&str]) -> Self {
        self.chunk(string_pool(strings, false))
    }

    pub fn package(mut self, package: Package) -> Self {
        self.packages += 1;
        self.chunk(package.build())
    }

    pub fn chunk(mut self, chunk: Vec<u8>) -> Self {
        self.children.push(chunk);
        self
    }

    /// Override the declared package count
    pub fn package_count(mut self, count: u32) -> Self {
        self.package_count = Some(count);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header = Vec::new();
        header
            .write_u32::<LittleEndian>(self.package_count.unwrap_or(self.packages))
            .unwrap();
        chunk(TABLE, &header, &self.children.concat())
    }
}

/// The table of a package `com.example` with one default configuration string chunk
pub fn example_table() -> Vec<u8> {
    Table::new()
        .values(&["MyApp", "Hello"])
        .package(
            Package::new(0x7F, "com.example")
                .keys(&["app_name", "greeting"])
                .chunk(type_spec(2, 2))
                .chunk(TypeChunk::new(2).string(0, 0).string(1, 1).build()),
        )
        .build()
}
