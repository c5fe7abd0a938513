use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// The fixed set of connector commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Open,
    Mkdir,
    Mkfile,
    Rename,
    Upload,
    Ping,
    Paste,
    Rm,
    Duplicate,
    Read,
    Edit,
    Extract,
    Archive,
    Tmb,
    Resize,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::Open,
        Command::Mkdir,
        Command::Mkfile,
        Command::Rename,
        Command::Upload,
        Command::Ping,
        Command::Paste,
        Command::Rm,
        Command::Duplicate,
        Command::Read,
        Command::Edit,
        Command::Extract,
        Command::Archive,
        Command::Tmb,
        Command::Resize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Open => "open",
            Command::Mkdir => "mkdir",
            Command::Mkfile => "mkfile",
            Command::Rename => "rename",
            Command::Upload => "upload",
            Command::Ping => "ping",
            Command::Paste => "paste",
            Command::Rm => "rm",
            Command::Duplicate => "duplicate",
            Command::Read => "read",
            Command::Edit => "edit",
            Command::Extract => "extract",
            Command::Archive => "archive",
            Command::Tmb => "tmb",
            Command::Resize => "resize",
        }
    }
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| AppError::InvalidCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
