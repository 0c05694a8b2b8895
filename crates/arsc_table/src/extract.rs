//! Selection of the string resources of a resource table
//!

use bon::Builder;
use derive_more::derive::{Constructor, Deref, IntoIterator};
use indexmap::IndexMap;
use std::io::Read;
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::string_pool::StringPool;
use crate::table::ResourceTable;
use crate::types::ResValue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which type chunks take part in an extraction
#[derive(Debug, Clone, Builder)]
pub struct ExtractOptions {
    /// Name of the resource type to extract
    #[builder(into, default = String::from("string"))]
    pub type_name: String,

    /// Accepted configuration languages, the empty string standing for the default configuration
    #[builder(default = vec![String::new(), String::from("en")])]
    pub languages: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Flat mapping of resource names to string values
///
/// Keys keep the position of their first insertion, values the last one written.
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StringTable(IndexMap<String, String>);

impl StringTable {
    /// Insert a value, replacing the value of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }
}

impl FromIterator<(String, String)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl StringTable {
    /// Write the mapping as a compact JSON object
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<()> {
        Ok(serde_json::to_writer(writer, self)?)
    }

    /// Read a mapping from a JSON object of strings
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Extracts the string resources of a resource table
///
/// ```no_run
/// fn print_strings(path: &str) -> arsc_table::error::Result<()> {
///     let file = std::fs::File::open(path)?;
///     let strings = arsc_table::StringExtractor::default().extract_reader(file)?;
///
///     for (key, value) in &strings {
///         println!("{}: {}", key, value);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringExtractor {
    options: ExtractOptions,
}

impl StringExtractor {
    /// Create an extractor with the given options
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options of this extractor
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the selected strings of the first package in `table`.
    ///
    /// Only the first package is considered. Values which do not resolve against the
    /// global string pool are skipped.
    #[instrument(skip_all, err)]
    pub fn extract(&self, table: &ResourceTable<'_>) -> Result<StringTable> {
        let mut strings = StringTable::default();

        let Some((package, ignored)) = table.packages().split_first() else {
            debug!("table holds no packages");
            return Ok(strings);
        };

        if !ignored.is_empty() {
            warn!(
                package = package.name(),
                ignored = ignored.len(),
                "only the first package is extracted"
            );
        }

        let values = table.string_pool();
        let keys = package.key_pool();

        for chunk in package.type_chunks() {
            let chunk = chunk?;

            let language = chunk.language_string();
            if chunk.type_name() != self.options.type_name
                || !self.options.languages.contains(&language)
            {
                trace!(
                    type_name = chunk.type_name(),
                    config = %chunk.config(),
                    "skipping type chunk"
                );
                continue;
            }

            debug!(
                config = %chunk.config(),
                entries = chunk.entries().len(),
                "extracting type chunk"
            );

            for entry in chunk.entries() {
                let Some(value) = entry.value else {
                    continue;
                };

                match resolve(values, &value) {
                    Ok(text) => {
                        strings.insert(keys.get(entry.key)?, text);
                    }
                    Err(e @ Error::UnresolvedValue { .. }) => {
                        debug!(index = entry.index, "skipping entry: {}", e);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(strings)
    }

    /// Decode `data` as a resource table and extract its strings
    pub fn extract_bytes(&self, data: &[u8]) -> Result<StringTable> {
        self.extract(&ResourceTable::parse(data)?)
    }

    /// Read a whole resource table from `reader` and extract its strings
    pub fn extract_reader<R: Read>(&self, mut reader: R) -> Result<StringTable> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.extract_bytes(&data)
    }
}

/// Resolve a value against the global string pool
fn resolve<'p>(pool: &'p StringPool, value: &ResValue) -> Result<&'p str> {
    pool.get(value.data).map_err(|_| Error::UnresolvedValue {
        index: value.data,
        count: pool.len(),
    })
}
