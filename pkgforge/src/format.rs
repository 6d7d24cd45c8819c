//! Post-write formatter hook

use std::io;
use std::path::Path;
use std::process::Command;

/// Formats a written source file in place
pub trait Formatter: Send + Sync {
    /// Format the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the formatter could not run or rejected the file.
    fn format(&self, path: &Path) -> io::Result<()>;
}

/// Leaves files untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Runs an external program with the file path as its last argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl Default for CommandFormatter {
    /// `gofmt -w <file>`
    fn default() -> Self {
        Self::new("gofmt", vec!["-w".to_string()])
    }
}

impl CommandFormatter {
    /// Create a formatter running `program args... <file>`
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, path: &Path) -> io::Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {status}", self.program)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_formatter() {
        assert!(NoopFormatter.format(Path::new("/does/not/matter.go")).is_ok());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let formatter = CommandFormatter::new("pkgforge-no-such-formatter", vec![]);
        assert!(formatter.format(Path::new("model.go")).is_err());
    }
}
