//! Outline sources available from the command line.

use deck_core::{Error, Outline, OutlineSource, Result};
use std::path::PathBuf;
use std::process::Command;

/// Reads a prepared outline from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutlineSource for JsonFileSource {
    fn generate(&mut self, topic: &str, slide_count: usize) -> Result<Outline> {
        log::debug!(
            "Reading outline for '{}' ({} slides) from {}",
            topic,
            slide_count,
            self.path.display()
        );
        let bytes = std::fs::read(&self.path).map_err(|e| {
            Error::GenerationFailed(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        Outline::from_slice(&bytes)
    }
}

/// Runs an external generator with `<topic> <slide_count>` appended to its
/// arguments and parses its standard output as outline JSON.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    /// Build from a command line split into words; the first word is the program.
    pub fn from_words(words: &[String]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl OutlineSource for CommandSource {
    fn generate(&mut self, topic: &str, slide_count: usize) -> Result<Outline> {
        log::debug!("Running generator '{}' for '{}'", self.program, topic);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(topic)
            .arg(slide_count.to_string())
            .output()
            .map_err(|e| Error::GenerationFailed(format!("cannot run '{}': {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GenerationFailed(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Outline::from_slice(&output.stdout)
    }
}
