use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{Result, CinetagError};

/// How the attachment editor finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolExit {
    /// Exit status 0
    Success,
    /// Exit status 1: the tool finished but printed warnings
    Warnings,
    /// Exit status 2: the tool reported an error and did not modify the file
    HardError,
    /// Any other status, or killed by a signal (`None`)
    Failed(Option<i32>),
}

impl ToolExit {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ToolExit::Success,
            Some(1) => ToolExit::Warnings,
            Some(2) => ToolExit::HardError,
            other => ToolExit::Failed(other),
        }
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolExit::Success => write!(f, "exit status 0"),
            ToolExit::Warnings => write!(f, "exit status 1 (warnings)"),
            ToolExit::HardError => write!(f, "exit status 2"),
            ToolExit::Failed(Some(code)) => write!(f, "exit status {}", code),
            ToolExit::Failed(None) => write!(f, "terminated by signal"),
        }
    }
}

/// Captured result of one tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub exit: ToolExit,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Last non-empty line the tool printed, which carries its error message
    pub fn last_message(&self) -> Option<&str> {
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
    }
}

/// Command line for the attachment editor
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ToolCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Target media file; must come before the edit actions
    pub fn media_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn delete_attachment<S: Into<String>>(self, selector: S) -> Self {
        self.arg("--delete-attachment").arg(selector)
    }

    pub fn attachment_name<S: Into<String>>(self, name: S) -> Self {
        self.arg("--attachment-name").arg(name)
    }

    pub fn attachment_mime_type<S: Into<String>>(self, mime_type: S) -> Self {
        self.arg("--attachment-mime-type").arg(mime_type)
    }

    pub fn add_attachment<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("--add-attachment").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Run the command to completion, blocking the calling thread
    pub fn execute(&self) -> Result<ToolOutput> {
        debug!("Executing attachment editor: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CinetagError::ToolNotFound(self.binary_path.clone()),
                _ => CinetagError::ExternalTool {
                    step: self.description.clone(),
                    reason: format!("failed to execute {}: {}", self.binary_path, e),
                },
            })?;

        let result = ToolOutput {
            exit: ToolExit::from_code(output.status.code()),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!("{} finished with {:?}", self.description, result.exit);

        Ok(result)
    }
}

/// Builds the attachment editor invocations
pub struct ToolCommandBuilder {
    binary_path: String,
}

impl ToolCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// `<tool> <media> --delete-attachment mime-type:<mime>`
    pub fn delete_attachments_by_mime<P: AsRef<Path>>(&self, media_path: P, mime_type: &str) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Deleting attachments")
            .media_file(media_path)
            .delete_attachment(format!("mime-type:{}", mime_type))
    }

    /// `<tool> <media> --attachment-name <name> --attachment-mime-type <mime> --add-attachment <file>`
    pub fn add_attachment<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        media_path: P,
        attachment_path: Q,
        name: &str,
        mime_type: &str,
    ) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Adding attachment")
            .media_file(media_path)
            .attachment_name(name)
            .attachment_mime_type(mime_type)
            .add_attachment(attachment_path)
    }

    pub fn version_check(&self) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Version check").arg("--version")
    }
}
