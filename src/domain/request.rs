//! Incoming connector requests.
//!
//! Clients usually send form-encoded parameters, so flags and numbers may
//! arrive as strings; the deserializers here accept either form.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// A single connector call: command name plus flat parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub cmd: String,
    #[serde(default, deserialize_with = "deserialize_handle")]
    pub current: Option<String>,
    #[serde(default, deserialize_with = "deserialize_handle")]
    pub target: Option<String>,
    #[serde(default, alias = "targets[]")]
    pub targets: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_dimension")]
    pub height: Option<u32>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    /// Paste destination handle.
    #[serde(default, deserialize_with = "deserialize_handle")]
    pub dst: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub cut: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub tree: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub init: bool,
    #[serde(default, alias = "upload[]")]
    pub upload: Vec<UploadedFile>,
}

impl Request {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into(), ..Self::default() }
    }
}

/// A file the surrounding server has already staged on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Location of the staged content.
    pub path: PathBuf,
    /// Name reported by the client.
    #[serde(default)]
    pub filename: String,
    /// Byte length; read from the staged file when absent.
    #[serde(default)]
    pub size: Option<u64>,
}

impl UploadedFile {
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self { path: path.into(), filename: filename.into(), size: None }
    }

    pub fn byte_len(&self) -> u64 {
        self.size.unwrap_or_else(|| fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        None => false,
        Some(FormValue::Bool(flag)) => flag,
        Some(FormValue::Int(n)) => n != 0,
        Some(FormValue::Float(n)) => n != 0.0,
        Some(FormValue::Text(text)) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
        }
    })
}

fn deserialize_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        Some(FormValue::Int(n)) => u32::try_from(n).ok(),
        Some(FormValue::Float(n)) if n >= 0.0 && n <= f64::from(u32::MAX) => Some(n as u32),
        Some(FormValue::Text(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn deserialize_handle<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|handle| !handle.is_empty()))
}
