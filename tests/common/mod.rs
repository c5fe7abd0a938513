//! Shared testing utilities for connector and CLI tests.

use assert_cmd::Command;
use elfc::ports::ToolRunner;
use elfc::{AppError, Connector, ConnectorConfig, ImageProcessorKind, Request, Response};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// An isolated root directory seeded with a small file tree:
///
/// ```text
/// files/README.txt  files/elfinder.png  files/pjkh.png
/// files/foo/{philip,sam,sandy,tom}.txt
/// ```
#[allow(dead_code)]
pub struct TestContext {
    dir: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory for tests");
        let root = dir.path().canonicalize().unwrap().join("files");
        fs::create_dir(&root).unwrap();

        fs::write(root.join("README.txt"), "This is a readme").unwrap();
        fs::write(root.join("elfinder.png"), b"\x89PNG elfinder").unwrap();
        fs::write(root.join("pjkh.png"), b"\x89PNG pjkh").unwrap();
        fs::create_dir(root.join("foo")).unwrap();
        for name in ["philip", "sam", "sandy", "tom"] {
            fs::write(root.join("foo").join(format!("{}.txt", name)), name).unwrap();
        }

        Self { dir, root }
    }

    /// The sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds the root; useful for planting files outside it.
    pub fn outside(&self) -> PathBuf {
        self.root.parent().unwrap().to_path_buf()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn config(&self) -> ConnectorConfig {
        let mut config = ConnectorConfig::new(&self.root, "/elfinder");
        config.image_processor = ImageProcessorKind::None;
        config
    }

    pub fn connector(&self) -> Connector {
        self.connector_with(self.config())
    }

    pub fn connector_with(&self, config: ConnectorConfig) -> Connector {
        Connector::new(config).expect("fixture configuration is valid")
    }

    /// Handle of a root-relative path through the public API.
    pub fn handle(&self, relative: &str) -> String {
        self.connector().handle_for(relative).unwrap()
    }

    /// Run a request and return only the response.
    pub fn run(&self, connector: &Connector, request: Request) -> Response {
        connector.run(&request).expect("request should not fail fatally").1
    }

    /// Write `content` as `elfc.toml` next to the root and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("elfc.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// A minimal configuration file whose root is the fixture tree.
    pub fn default_config_file(&self) -> PathBuf {
        self.write_config("root = \"files\"\nurl = \"/elfinder\"\nimage_processor = \"none\"\n")
    }

    /// Build a command for invoking the compiled `elfc` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("elfc").expect("Failed to locate elfc binary");
        cmd.current_dir(self.dir.path()).env_remove("ELFC_LOG");
        cmd
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub struct RecordedRun {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Tool runner that records invocations instead of spawning processes.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct RecordingToolRunner {
    runs: Arc<Mutex<Vec<RecordedRun>>>,
}

#[allow(dead_code)]
impl RecordingToolRunner {
    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

impl ToolRunner for RecordingToolRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), AppError> {
        self.runs.lock().unwrap().push(RecordedRun {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        Ok(())
    }
}
