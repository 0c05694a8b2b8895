use arsc_table::StringExtractor;
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, info};

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// An input resources.arsc file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// The JSON file to write the strings to
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let (Some(input), Some(output)) = (&self.input, &self.output) else {
            debug!("no input and output given, nothing to do");
            return Ok(());
        };

        let data = std::fs::read(input)
            .into_diagnostic()
            .context(format!("path: {}", input.display()))?;

        // The output is only created once the table decoded
        let strings = StringExtractor::default()
            .extract_bytes(&data)
            .context(format!("decoding {}", input.display()))?;

        info!("writing {} strings to {}", strings.len(), output.display());

        let f = File::create(output)
            .into_diagnostic()
            .context(format!("creating {}", output.display()))?;
        let mut writer = BufWriter::new(f);
        strings.to_writer(&mut writer)?;
        writer.flush().into_diagnostic()?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use miette::IntoDiagnostic;
    use std::path::PathBuf;

    use super::ExtractArgs;

    #[test]
    fn missing_arguments_do_nothing() -> miette::Result<()> {
        ExtractArgs::default().handle()?;

        ExtractArgs {
            input: Some(PathBuf::from("does/not/exist.arsc")),
            output: None,
        }
        .handle()?;

        Ok(())
    }

    #[test]
    fn unreadable_input_fails() {
        let args = ExtractArgs {
            input: Some(PathBuf::from("does/not/exist.arsc")),
            output: Some(PathBuf::from("does/not/exist.json")),
        };

        assert!(args.handle().is_err());
    }

    #[test]
    fn malformed_input_writes_nothing() -> miette::Result<()> {
        let dir = tempfile::tempdir().into_diagnostic()?;

        // Table chunk declaring 0x100 bytes in a 12 byte file
        let input = dir.path().join("resources.arsc");
        std::fs::write(&input, [0x02, 0x00, 0x0C, 0x00, 0x00, 0x01, 0x00, 0x00, 0, 0, 0, 0])
            .into_diagnostic()?;
        let output = dir.path().join("strings.json");

        let args = ExtractArgs {
            input: Some(input),
            output: Some(output.clone()),
        };
        assert!(args.handle().is_err());
        assert!(!output.exists());

        Ok(())
    }
}
