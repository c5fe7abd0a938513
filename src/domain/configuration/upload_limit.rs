use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum upload size: a byte count or a string such as `"50M"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadLimit {
    Bytes(u64),
    Text(String),
}

impl Default for UploadLimit {
    fn default() -> Self {
        UploadLimit::Text("50M".to_string())
    }
}

impl UploadLimit {
    /// The limit in bytes; 0 means unlimited.
    ///
    /// Strings use the first run of digits, optionally followed by a binary
    /// `K`, `M` or `G` multiplier. Anything unparsable yields 0.
    pub fn bytes(&self) -> u64 {
        match self {
            UploadLimit::Bytes(bytes) => *bytes,
            UploadLimit::Text(text) => parse_size(text.trim()),
        }
    }
}

fn parse_size(text: &str) -> u64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let rest = &text[start..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let Ok(value) = rest[..end].parse::<u64>() else {
        return 0;
    };
    let multiplier: u64 = match rest[end..].chars().next() {
        Some('K') => 1 << 10,
        Some('M') => 1 << 20,
        Some('G') => 1 << 30,
        _ => 1,
    };
    value.saturating_mul(multiplier)
}

impl fmt::Display for UploadLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadLimit::Bytes(bytes) => write!(f, "{}", bytes),
            UploadLimit::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> u64 {
        UploadLimit::Text(s.to_string()).bytes()
    }

    #[test]
    fn suffixes_are_binary_multiples() {
        assert_eq!(text("50M"), 50 * 1024 * 1024);
        assert_eq!(text("10K"), 10 * 1024);
        assert_eq!(text("2G"), 2 * 1024 * 1024 * 1024);
        assert_eq!(text(" 123 "), 123);
    }

    #[test]
    fn lowercase_suffix_is_plain_bytes() {
        assert_eq!(text("5m"), 5);
    }

    #[test]
    fn unparsable_means_unlimited() {
        assert_eq!(text("lots"), 0);
        assert_eq!(text(""), 0);
    }

    #[test]
    fn default_is_fifty_megabytes() {
        assert_eq!(UploadLimit::default().bytes(), 50 * 1024 * 1024);
        assert_eq!(UploadLimit::Bytes(42).bytes(), 42);
    }
}
