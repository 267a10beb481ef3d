//! Writers for the pipeline's shared environment store

use crate::error::{Error, Result};
use crate::output::computed::PullRequestOutputs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Heredoc delimiter for GitHub Actions multiline outputs
const GHA_DELIMITER: &str = "GPRI_EOF";

/// Destination for exported key/value pairs
pub trait EnvExporter {
    /// Export one key/value pair
    fn export(&mut self, key: &str, value: &str) -> Result<()>;

    /// Flush anything buffered once all pairs are exported
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Export every output in order, stopping at the first failure
pub fn export_all(exporter: &mut dyn EnvExporter, outputs: &PullRequestOutputs) -> Result<()> {
    for (key, value) in outputs.entries() {
        exporter.export(key, value)?;
    }
    exporter.finish()
}

/// Bitrise `envman` store: `envman add --key KEY` with the value on stdin
#[derive(Debug, Clone)]
pub struct EnvmanExporter {
    program: PathBuf,
}

impl Default for EnvmanExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvmanExporter {
    /// Use `envman` from `PATH`
    pub fn new() -> Self {
        Self::with_program("envman")
    }

    /// Use a specific envman executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EnvExporter for EnvmanExporter {
    fn export(&mut self, key: &str, value: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(["add", "--key", key])
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                Error::Export(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(value.as_bytes())
                .map_err(|e| Error::Export(format!("failed to pass {} to envman: {}", key, e)))?;
        }

        let status = child.wait().map_err(|e| {
            Error::Export(format!("failed to wait for envman add --key {}: {}", key, e))
        })?;
        if !status.success() {
            return Err(Error::Export(format!(
                "envman add --key {} exited with {}",
                key, status
            )));
        }
        Ok(())
    }
}

/// GitHub Actions `$GITHUB_OUTPUT` file, multiline syntax
#[derive(Debug)]
pub struct GithubOutputExporter {
    file: File,
}

impl GithubOutputExporter {
    /// Open the output file for appending
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| {
                Error::Export(format!(
                    "cannot open GITHUB_OUTPUT ({}): {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self { file })
    }
}

impl EnvExporter for GithubOutputExporter {
    fn export(&mut self, key: &str, value: &str) -> Result<()> {
        if value.lines().any(|line| line == GHA_DELIMITER) {
            return Err(Error::Export(format!(
                "value of {} contains the output delimiter line",
                key
            )));
        }

        writeln!(self.file, "{key}<<{GHA_DELIMITER}")
            .and_then(|_| writeln!(self.file, "{value}"))
            .and_then(|_| writeln!(self.file, "{GHA_DELIMITER}"))
            .map_err(|e| Error::Export(format!("failed to write {}: {}", key, e)))
    }

    fn finish(&mut self) -> Result<()> {
        self.file
            .flush()
            .map_err(|e| Error::Export(format!("failed to flush GITHUB_OUTPUT: {}", e)))
    }
}

/// Single JSON object written on `finish`
#[derive(Debug)]
pub struct JsonExporter<W: Write> {
    writer: W,
    values: serde_json::Map<String, serde_json::Value>,
}

impl<W: Write> JsonExporter<W> {
    /// Write the object to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            values: serde_json::Map::new(),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EnvExporter for JsonExporter<W> {
    fn export(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let object = serde_json::Value::Object(std::mem::take(&mut self.values));
        serde_json::to_writer(&mut self.writer, &object)
            .map_err(|e| Error::Export(format!("failed to write JSON outputs: {}", e)))?;
        writeln!(self.writer).map_err(|e| Error::Export(e.to_string()))
    }
}
