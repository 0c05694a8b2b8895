//! Decoding of package chunks
//!

use tracing::{instrument, trace};

use crate::chunk::{Chunk, ChunkIter, ChunkType};
use crate::error::{Error, Result};
use crate::string_pool::StringPool;
use crate::type_chunk::TypeChunk;
use crate::types::{ChunkHeader, PackageHeader};

/// A package and the string pools it owns
///
/// Type chunks are only decoded while iterating over [`Package::type_chunks`].
#[derive(Debug, Clone)]
pub struct Package<'a> {
    chunk: Chunk<'a>,
    id: u32,
    name: String,
    type_pool: Option<StringPool>,
    key_pool: StringPool,
}

impl<'a> Package<'a> {
    /// Decode the header and string pools of the package held by `chunk`.
    #[instrument(skip_all, fields(offset = chunk.offset()), err)]
    pub fn parse(chunk: Chunk<'a>) -> Result<Package<'a>> {
        let chunk = chunk.expect_kind(ChunkType::Package)?;

        if chunk.header_size() < ChunkHeader::SIZE + PackageHeader::SIZE {
            return Err(Error::malformed(
                chunk.offset(),
                format!("package header of {} bytes is too small", chunk.header_size()),
            ));
        }

        let header = PackageHeader::parse(&chunk.reader(), ChunkHeader::SIZE)?;
        let type_strings = header.type_strings as usize;
        let key_strings = header.key_strings as usize;

        let mut type_pool = None;
        let mut key_pool = None;
        let mut unclaimed = Vec::new();

        for child in chunk.children() {
            let child = child?;
            if child.kind() != ChunkType::StringPool {
                continue;
            }

            let relative = child.offset() - chunk.offset();
            if type_strings != 0 && relative == type_strings {
                type_pool = Some(StringPool::parse(child)?);
            } else if key_strings != 0 && relative == key_strings {
                key_pool = Some(StringPool::parse(child)?);
            } else {
                unclaimed.push(child);
            }
        }

        // Without offsets the pools are found in order: type names, then key names
        let mut unclaimed = unclaimed.into_iter();
        if type_strings == 0 {
            type_pool = unclaimed.next().map(StringPool::parse).transpose()?;
        }
        if key_strings == 0 {
            key_pool = unclaimed.next().map(StringPool::parse).transpose()?;
        }

        let key_pool = key_pool.ok_or_else(|| {
            Error::malformed(chunk.offset(), "package has no key name string pool")
        })?;

        let name = header.name();
        trace!(
            id = header.id,
            name = name.as_str(),
            types = type_pool.as_ref().map(StringPool::len),
            keys = key_pool.len(),
            "decoded package"
        );

        Ok(Package {
            chunk,
            id: header.id,
            name,
            type_pool,
            key_pool,
        })
    }

    /// The package id, `0x7f` for applications
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The package name such as `com.example`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the resource types, indexed by type id - 1
    pub fn type_pool(&self) -> Option<&StringPool> {
        self.type_pool.as_ref()
    }

    /// Names of the resource entries
    pub fn key_pool(&self) -> &StringPool {
        &self.key_pool
    }

    /// Iterate over the type chunks of this package in file order.
    ///
    /// Type spec chunks and any other chunk kinds are skipped.
    pub fn type_chunks(&self) -> TypeChunks<'_, 'a> {
        TypeChunks {
            children: self.chunk.children(),
            type_pool: self.type_pool.as_ref(),
            package: self.chunk.offset(),
            done: false,
        }
    }
}

/// Single pass iterator over the type chunks of a package
#[derive(Debug)]
pub struct TypeChunks<'p, 'a> {
    children: ChunkIter<'a>,
    type_pool: Option<&'p StringPool>,
    package: usize,
    done: bool,
}

impl<'a> Iterator for TypeChunks<'_, 'a> {
    type Item = Result<TypeChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for child in self.children.by_ref() {
            let result = child.and_then(|child| match child.kind() {
                ChunkType::Type => match self.type_pool {
                    Some(pool) => TypeChunk::parse(child, pool).map(Some),
                    None => Err(Error::malformed(
                        self.package,
                        "package has type chunks but no type name string pool",
                    )),
                },
                ChunkType::TypeSpec | ChunkType::StringPool => Ok(None),
                other => {
                    trace!(kind = %other, offset = child.offset(), "skipping chunk");
                    Ok(None)
                }
            });

            match result {
                Ok(Some(chunk)) => return Some(Ok(chunk)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        None
    }
}

impl std::iter::FusedIterator for TypeChunks<'_, '_> {}
