//! Fixtures and test doubles shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tempfile::TempDir;

use crate::app::Connector;
use crate::domain::{AppError, ConnectorConfig, ImageProcessorKind};
use crate::ports::{ImageProcessor, ToolRunner};

/// A temporary root laid out like a small user folder:
///
/// ```text
/// README.txt  elfinder.png  pjkh.png
/// foo/{philip,sam,sandy,tom}.txt
/// ```
pub struct FixtureTree {
    _dir: TempDir,
    root: PathBuf,
}

impl FixtureTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();

        fs::write(root.join("README.txt"), "This is a readme").unwrap();
        fs::write(root.join("elfinder.png"), b"\x89PNG elfinder").unwrap();
        fs::write(root.join("pjkh.png"), b"\x89PNG pjkh").unwrap();
        fs::create_dir(root.join("foo")).unwrap();
        for name in ["philip", "sam", "sandy", "tom"] {
            fs::write(root.join("foo").join(format!("{}.txt", name)), name).unwrap();
        }

        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Handle of a root-relative path; `""` is the root.
    pub fn handle(&self, relative: &str) -> String {
        URL_SAFE_NO_PAD.encode(if relative.is_empty() { "." } else { relative })
    }

    pub fn config(&self) -> ConnectorConfig {
        let mut config = ConnectorConfig::new(&self.root, "/elfinder");
        config.image_processor = ImageProcessorKind::None;
        config
    }

    pub fn connector(&self) -> Connector {
        self.connector_with(self.config())
    }

    /// A connector over this tree with fake image and tool collaborators.
    pub fn connector_with(&self, config: ConnectorConfig) -> Connector {
        Connector::new(config)
            .unwrap()
            .with_image_processor(FakeImageProcessor::default())
            .with_tool_runner(FakeToolRunner::default())
    }
}

/// Image processor that records calls; thumbnails are written as small stubs.
#[derive(Clone, Default)]
pub struct FakeImageProcessor {
    resizes: Arc<Mutex<Vec<(PathBuf, u32, u32)>>>,
    thumbnails: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    fail: bool,
}

impl FakeImageProcessor {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn resize_calls(&self) -> Vec<(PathBuf, u32, u32)> {
        self.resizes.lock().unwrap().clone()
    }

    pub fn thumbnail_calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.thumbnails.lock().unwrap().clone()
    }

    fn check(&self, command: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::ExternalTool {
                command: command.to_string(),
                details: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ImageProcessor for FakeImageProcessor {
    fn size_of(&self, _path: &Path) -> Option<String> {
        Some("100x100".to_string())
    }

    fn resize(&self, path: &Path, width: u32, height: u32) -> Result<(), AppError> {
        self.check("mogrify")?;
        self.resizes.lock().unwrap().push((path.to_path_buf(), width, height));
        Ok(())
    }

    fn thumbnail(&self, src: &Path, dst: &Path, _width: u32, _height: u32) -> Result<(), AppError> {
        self.check("convert")?;
        fs::write(dst, b"thumbnail")?;
        self.thumbnails.lock().unwrap().push((src.to_path_buf(), dst.to_path_buf()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Tool runner that records invocations instead of spawning processes.
#[derive(Clone, Default)]
pub struct FakeToolRunner {
    calls: Arc<Mutex<Vec<ToolCall>>>,
    fail: bool,
}

impl FakeToolRunner {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for FakeToolRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(ToolCall {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        if self.fail {
            return Err(AppError::ExternalTool {
                command: program.to_string(),
                details: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}
