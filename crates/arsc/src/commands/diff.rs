use arsc_table::{StringExtractor, StringTable};
use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{fmt::Display, path::Path, path::PathBuf};
use tracing::{debug, info};

/// Leading bytes of a resource table, its chunk tag in little endian
const TABLE_MAGIC: [u8; 2] = [0x02, 0x00];

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    #[default]
    Semantic,
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Modified(String, String, String, Vec<String>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(key, value) => {
                writeln!(f, "✅ {}: {}", key, value.green())
            }
            Change::Removed(key, value) => {
                writeln!(f, "❌ {}: {}", key, value.red())
            }
            Change::Modified(key, old, new, context) if context.is_empty() => {
                writeln!(f, "🔃 {}: {} vs {}", key.blue(), old.red(), new.green())
            }
            Change::Modified(key, _, _, context) => {
                writeln!(f, "🔃 {}", key.blue())?;
                writeln!(
                    f,
                    "{}",
                    context
                        .iter()
                        .flat_map(|c| c.lines())
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct DiffArgs {
    /// The previous resources.arsc or JSON mapping
    #[arg(value_name = "LEFT")]
    left: Option<PathBuf>,

    /// The current resources.arsc or JSON mapping
    #[arg(value_name = "RIGHT")]
    right: Option<PathBuf>,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,
}

/// Read the strings of a resource table, or of a mapping written by a previous extraction
fn load(path: &Path) -> Result<StringTable> {
    let data = std::fs::read(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    let strings = if data.starts_with(&TABLE_MAGIC) {
        debug!("reading {} as a resource table", path.display());
        StringExtractor::default().extract_bytes(&data)
    } else {
        debug!("reading {} as a JSON mapping", path.display());
        StringTable::from_reader(data.as_slice())
    };

    strings.context(format!("decoding {}", path.display()))
}

/// Inline changes between two values, emphasizing the differing words
fn inline_changes(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);

    let mut lines = Vec::new();
    for op in diff.ops().iter() {
        for change in diff.iter_inline_changes(op) {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };

            let mut context = String::from(sign);
            for (emphasized, value) in change.iter_strings_lossy() {
                let value = value.trim_end_matches('\n');
                if emphasized {
                    if change.tag() == ChangeTag::Insert {
                        context.push_str(&format!("{}", value.green().underline()));
                    } else {
                        context.push_str(&format!("{}", value.red().underline()));
                    }
                } else {
                    context.push_str(&format!("{}", value.dimmed()));
                }
            }
            lines.push(context);
        }
    }
    lines
}

fn compare(left: &StringTable, right: &StringTable, mode: Mode) -> Vec<Change> {
    let mut result = Vec::new();

    // Find Added Entries
    right
        .iter()
        .filter(|(k, _)| !left.contains_key(k.as_str()))
        .sorted()
        .map(|(k, v)| Change::Added(k.clone(), v.clone()))
        .for_each(|c| result.push(c));

    // Find Removed Entries
    left.iter()
        .filter(|(k, _)| !right.contains_key(k.as_str()))
        .sorted()
        .map(|(k, v)| Change::Removed(k.clone(), v.clone()))
        .for_each(|c| result.push(c));

    // Find Differences, empty values count as values
    left.iter()
        .sorted()
        .filter_map(|(k, old)| {
            let new = right.get(k.as_str())?;
            if old == new {
                return None;
            }

            let context = match mode {
                Mode::Semantic => Vec::new(),
                Mode::Full => inline_changes(old, new),
            };
            Some(Change::Modified(k.clone(), old.clone(), new.clone(), context))
        })
        .for_each(|c| result.push(c));

    result
}

impl DiffArgs {
    pub fn handle(&self) -> Result<()> {
        let (Some(left), Some(right)) = (&self.left, &self.right) else {
            debug!("diff needs two paths, nothing to do");
            return Ok(());
        };

        let left = load(left)?;
        let right = load(right)?;

        let changes = compare(&left, &right, self.mode);
        info!(
            "{} strings vs {} strings, {} changes",
            left.len(),
            right.len(),
            changes.len()
        );

        for change in &changes {
            print!("{}", change);
        }

        Ok(())
    }
}
