//! Runs external programs without a shell.

use std::path::Path;
use std::process::Command;

use shlex::try_join;
use tracing::debug;

use crate::domain::AppError;
use crate::ports::ToolRunner;

/// Quoted command line, for logs and error messages.
pub(crate) fn escape_command(program: &str, args: &[String]) -> String {
    let words: Vec<&str> = std::iter::once(program).chain(args.iter().map(String::as_str)).collect();
    try_join(words.iter().copied()).unwrap_or_else(|_| words.join(" "))
}

/// Run `program` in `cwd` and return its trimmed stdout.
///
/// Spawn failures and non-zero exits become [`AppError::ExternalTool`].
pub(crate) fn run_program(program: &str, args: &[String], cwd: &Path) -> Result<String, AppError> {
    let command_line = escape_command(program, args);
    debug!(command = %command_line, cwd = %cwd.display(), "running external tool");

    let output = Command::new(program).args(args).current_dir(cwd).output().map_err(|e| {
        AppError::ExternalTool { command: command_line.clone(), details: e.to_string() }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(AppError::ExternalTool {
            command: command_line,
            details: if stderr.is_empty() { output.status.to_string() } else { stderr },
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// [`ToolRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), AppError> {
        run_program(program, args, cwd).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn escape_command_quotes_spaces() {
        let args = vec!["-r".to_string(), "my archive.zip".to_string()];
        let line = escape_command("zip", &args);
        assert_eq!(shlex::split(&line).unwrap(), vec!["zip", "-r", "my archive.zip"]);
    }

    #[test]
    fn missing_program_is_an_external_tool_error() {
        let dir = TempDir::new().unwrap();
        let err = ProcessToolRunner.run("elfc-no-such-program", &[], dir.path()).unwrap_err();
        assert!(matches!(err, AppError::ExternalTool { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_the_given_directory() {
        let dir = TempDir::new().unwrap();
        let args = vec!["marker".to_string()];
        ProcessToolRunner.run("touch", &args, dir.path()).unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ProcessToolRunner.run("false", &[], dir.path()).unwrap_err();
        assert!(matches!(err, AppError::ExternalTool { .. }));
    }
}
