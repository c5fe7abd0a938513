//! Effective permission evaluation.
//!
//! For `read`, `write` and `rm` a single matching rule that sets the flag to
//! `false` denies it. `hidden` works the other way round: one matching rule
//! setting it to `true` hides the path.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::configuration::RuleConfig;
use crate::domain::{AppError, SandboxedPath};

/// Effective flags for one path, as sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Permissions {
    #[serde(default = "default_true")]
    pub read: bool,
    #[serde(default = "default_true")]
    pub write: bool,
    #[serde(default = "default_true")]
    pub rm: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self { read: true, write: true, rm: true, hidden: false }
    }
}

fn default_true() -> bool {
    true
}

/// How a rule selects paths, by their root-relative form (`"."` is the root).
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Exact(String),
    /// Unanchored regular expression search.
    Pattern(Regex),
}

impl PathMatcher {
    pub fn matches(&self, relative: &str) -> bool {
        match self {
            PathMatcher::Exact(path) => path == relative,
            PathMatcher::Pattern(regex) => regex.is_match(relative),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PermissionRule {
    pub matcher: PathMatcher,
    pub read: Option<bool>,
    pub write: Option<bool>,
    pub rm: Option<bool>,
    pub hidden: Option<bool>,
}

impl PermissionRule {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::with_matcher(PathMatcher::Exact(path.into()))
    }

    pub fn pattern(pattern: &str) -> Result<Self, AppError> {
        let regex = Regex::new(pattern).map_err(|e| {
            AppError::InvalidConfig(format!("invalid permission pattern '{}': {}", pattern, e))
        })?;
        Ok(Self::with_matcher(PathMatcher::Pattern(regex)))
    }

    fn with_matcher(matcher: PathMatcher) -> Self {
        Self { matcher, read: None, write: None, rm: None, hidden: None }
    }

    pub fn read(mut self, allow: bool) -> Self {
        self.read = Some(allow);
        self
    }

    pub fn write(mut self, allow: bool) -> Self {
        self.write = Some(allow);
        self
    }

    pub fn rm(mut self, allow: bool) -> Self {
        self.rm = Some(allow);
        self
    }

    pub fn hidden(mut self, hide: bool) -> Self {
        self.hidden = Some(hide);
        self
    }

    pub fn from_config(config: &RuleConfig) -> Result<Self, AppError> {
        let rule = match (&config.path, &config.pattern) {
            (Some(path), None) => Self::exact(path.clone()),
            (None, Some(pattern)) => Self::pattern(pattern)?,
            _ => {
                return Err(AppError::InvalidConfig(
                    "each permission rule needs exactly one of 'path' or 'pattern'".to_string(),
                ));
            }
        };
        Ok(Self { read: config.read, write: config.write, rm: config.rm, hidden: config.hidden, ..rule })
    }
}

/// What the operating system lets the process do with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability {
    pub readable: bool,
    pub writable: bool,
}

impl Capability {
    pub fn of(path: &SandboxedPath) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self { readable: path.readable(), writable: path.writable() }
    }
}

/// Combines filesystem capability, global defaults and the rule set.
#[derive(Debug, Clone, Default)]
pub struct PermissionEngine {
    defaults: Permissions,
    rules: Vec<PermissionRule>,
}

impl PermissionEngine {
    pub fn new(defaults: Permissions, rules: Vec<PermissionRule>) -> Self {
        Self { defaults, rules }
    }

    pub fn evaluate(&self, path: &SandboxedPath) -> Permissions {
        self.evaluate_relative(&path.relative_display(), path.is_root(), Capability::of(path))
    }

    pub(crate) fn evaluate_relative(
        &self,
        relative: &str,
        is_root: bool,
        capability: Capability,
    ) -> Permissions {
        let matching: Vec<&PermissionRule> =
            self.rules.iter().filter(|rule| rule.matcher.matches(relative)).collect();

        Permissions {
            read: capability.readable && allows(&matching, |r| r.read) && self.defaults.read,
            write: capability.writable && allows(&matching, |r| r.write) && self.defaults.write,
            rm: !is_root && allows(&matching, |r| r.rm) && self.defaults.rm,
            hidden: self.defaults.hidden || matching.iter().any(|rule| rule.hidden == Some(true)),
        }
    }
}

fn allows(rules: &[&PermissionRule], flag: impl Fn(&PermissionRule) -> Option<bool>) -> bool {
    rules.iter().all(|rule| flag(*rule) != Some(false))
}
