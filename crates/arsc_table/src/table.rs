//! Decoding of the top level resource table chunk
//!

use tracing::{debug, instrument};

use crate::chunk::{ChunkReader, ChunkType};
use crate::error::{Error, Result};
use crate::package::Package;
use crate::string_pool::StringPool;
use crate::types::{ChunkHeader, TableHeader};

/// A decoded resource table
///
/// ```no_run
/// fn list_packages(data: &[u8]) -> arsc_table::error::Result<()> {
///     let table = arsc_table::ResourceTable::parse(data)?;
///
///     for package in table.packages() {
///         println!("{:#04x} {}", package.id(), package.name());
///         for chunk in package.type_chunks() {
///             let chunk = chunk?;
///             println!("  {} ({})", chunk.type_name(), chunk.config());
///         }
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ResourceTable<'a> {
    string_pool: StringPool,
    packages: Vec<Package<'a>>,
}

impl<'a> ResourceTable<'a> {
    /// Decode the resource table at the start of `data`.
    #[instrument(skip_all, fields(len = data.len()), err)]
    pub fn parse(data: &'a [u8]) -> Result<ResourceTable<'a>> {
        let chunk = ChunkReader::new(data).chunk(0)?.expect_kind(ChunkType::Table)?;

        if chunk.header_size() < ChunkHeader::SIZE + TableHeader::SIZE {
            return Err(Error::malformed(
                chunk.offset(),
                format!("table header of {} bytes is too small", chunk.header_size()),
            ));
        }

        let header = TableHeader::parse(&chunk.reader(), ChunkHeader::SIZE)?;

        let mut string_pool = None;
        let mut packages = Vec::new();
        for child in chunk.children() {
            let child = child?;
            match child.kind() {
                ChunkType::StringPool => {
                    if string_pool.is_some() {
                        return Err(Error::malformed(
                            child.offset(),
                            "table holds more than one global string pool",
                        ));
                    }
                    string_pool = Some(StringPool::parse(child)?);
                }
                ChunkType::Package => {
                    if string_pool.is_none() {
                        return Err(Error::malformed(
                            child.offset(),
                            "package precedes the global string pool",
                        ));
                    }
                    packages.push(Package::parse(child)?);
                }
                other => {
                    debug!(kind = %other, offset = child.offset(), "skipping chunk");
                }
            }
        }

        let string_pool = string_pool
            .ok_or_else(|| Error::malformed(chunk.offset(), "table has no global string pool"))?;

        if packages.len() != header.package_count as usize {
            return Err(Error::malformed(
                chunk.offset(),
                format!(
                    "table declares {} packages but holds {}",
                    header.package_count,
                    packages.len()
                ),
            ));
        }

        debug!(
            strings = string_pool.len(),
            packages = packages.len(),
            "decoded resource table"
        );

        Ok(ResourceTable {
            string_pool,
            packages,
        })
    }

    /// The global pool holding the string values
    pub fn string_pool(&self) -> &StringPool {
        &self.string_pool
    }

    /// The packages in file order
    pub fn packages(&self) -> &[Package<'a>] {
        &self.packages
    }

    /// Number of packages in the table
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Find a package by its id
    pub fn package(&self, id: u32) -> Option<&Package<'a>> {
        self.packages.iter().find(|p| p.id() == id)
    }
}
