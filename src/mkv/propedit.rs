use std::path::Path;
use tracing::{info, debug, warn};

use crate::config::MkvConfig;
use crate::error::{Result, CinetagError};
use super::{AttachmentEditor, ToolCommand, ToolCommandBuilder, ToolExit};

/// Attachment editor backed by mkvpropedit
pub struct MkvPropEdit {
    config: MkvConfig,
    command_builder: ToolCommandBuilder,
}

impl MkvPropEdit {
    pub fn new(config: MkvConfig) -> Self {
        let command_builder = ToolCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }

    /// Run an edit command and map its exit status onto the error taxonomy
    fn run(&self, command: ToolCommand) -> Result<()> {
        let output = command.execute()?;

        match output.exit {
            ToolExit::Success => Ok(()),
            ToolExit::Warnings if self.config.allow_warnings => {
                warn!(
                    "{} completed with warnings: {}",
                    command.description,
                    output.last_message().unwrap_or("no details")
                );
                Ok(())
            }
            exit => Err(CinetagError::ExternalTool {
                step: command.description.clone(),
                reason: match output.last_message() {
                    Some(message) => format!("{}: {}", exit, message),
                    None => exit.to_string(),
                },
            }),
        }
    }
}

impl AttachmentEditor for MkvPropEdit {
    fn check_availability(&self) -> Result<()> {
        let output = self.command_builder.version_check().execute()?;

        if output.exit == ToolExit::Success {
            info!("{} is available", self.config.binary_path);
            Ok(())
        } else {
            Err(CinetagError::ToolNotFound(self.config.binary_path.clone()))
        }
    }

    fn version(&self) -> Result<String> {
        debug!("Getting {} version information", self.config.binary_path);

        let output = self.command_builder.version_check().execute()?;
        if output.exit != ToolExit::Success {
            return Err(CinetagError::ToolNotFound(self.config.binary_path.clone()));
        }

        let first_line = output.stdout.lines().next().unwrap_or("Unknown version");
        Ok(first_line.trim().to_string())
    }

    fn delete_attachments_by_mime(&self, media_path: &Path, mime_type: &str) -> Result<()> {
        info!("Deleting {} attachments from {}", mime_type, media_path.display());

        let command = self.command_builder.delete_attachments_by_mime(media_path, mime_type);
        self.run(command)
    }

    fn add_attachment(&self, media_path: &Path, attachment_path: &Path, name: &str, mime_type: &str) -> Result<()> {
        info!("Adding attachment {} ({}) to {}", name, mime_type, media_path.display());

        let command = self.command_builder.add_attachment(media_path, attachment_path, name, mime_type);
        self.run(command)
    }
}
