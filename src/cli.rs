use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

mod terminal;

use anyhow::Context;
use clap::ArgAction;
use plotto::{convert, Config, HtmlWriter};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The catalog source file
    #[arg(short, long, default_value = "plotto.txt")]
    input: PathBuf,

    /// The HTML document to write
    #[arg(short, long, default_value = "plotto.html")]
    output: PathBuf,

    /// Optional page configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e))?,
            None => {
                tracing::debug!("no page configuration given, using the default chrome");
                Config::default()
            }
        };

        convert_paths(&self.input, &self.output, config)?;

        println!(
            "{}",
            format!(
                "Converted {} to {}",
                self.input.display(),
                self.output.display()
            )
            .success()
        );
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Converts the catalog at `input` into an HTML document at `output`.
///
/// The output handle is a buffered writer scoped to this call; it flushes
/// on drop on every exit path, including the error path.
#[instrument(skip(config))]
fn convert_paths(input: &Path, output: &Path, config: Config) -> anyhow::Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("unable to open \"{}\" for reading", input.display()))?;
    let file = fs::File::create(output)
        .with_context(|| format!("unable to open \"{}\" for writing", output.display()))?;

    let mut writer = HtmlWriter::new(BufWriter::new(file), config);
    convert(source.lines(), &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("unable to write \"{}\"", output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn convert_source(source: &str) -> String {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("plotto.txt");
        let output = tmp.path().join("plotto.html");
        fs::write(&input, source).unwrap();

        convert_paths(&input, &output, Config::default()).expect("conversion should succeed");
        fs::read_to_string(&output).unwrap()
    }

    #[test]
    fn converts_a_minimal_catalog_end_to_end() {
        let html = convert_source("Conflict{1}\nPRE: (2a)\nsome text\nPOST: (3)\n");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"conflictid\" id=\"1\">1</div>"));
        assert!(html.contains("<a href=\"#2\" class=\"clink\">2a</a>"));
        assert!(html.contains("<div class=\"desc\">some text</div>"));
        assert!(html.contains("<a href=\"#3\" class=\"clink\">3</a>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn missing_input_file_is_a_fatal_diagnostic() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("missing.txt");
        let output = tmp.path().join("plotto.html");

        let error = convert_paths(&input, &output, Config::default()).unwrap_err();
        assert!(error.to_string().contains("for reading"));
    }

    #[test]
    fn grammar_error_surfaces_the_entry_id() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("plotto.txt");
        let output = tmp.path().join("plotto.html");
        fs::write(&input, "Conflict{77}\nPRE: not-a-reference\n").unwrap();

        let error = convert_paths(&input, &output, Config::default()).unwrap_err();
        assert!(error.to_string().contains("conflict 77"));
        // The failed run still leaves a flushed, partial document behind.
        assert!(output.exists());
    }

    #[test]
    fn custom_config_reaches_the_page_head() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("plotto.txt");
        let output = tmp.path().join("plotto.html");
        let config_path = tmp.path().join("plotto.toml");
        fs::write(&input, "Conflict{1}\n").unwrap();
        fs::write(
            &config_path,
            "_version = \"1\"\ntitle = \"Catalog of Conflicts\"\n",
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        convert_paths(&input, &output, config).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>Catalog of Conflicts</title>"));
    }
}
