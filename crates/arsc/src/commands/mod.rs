pub mod diff;
pub mod extract;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Compare the strings of two resource tables or JSON mappings
    Diff(diff::DiffArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Diff(diff) => diff.handle(),
        }
    }
}
