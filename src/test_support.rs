// Scripted command backend for tests

//! Test double for [`crate::exec::CommandBackend`].
//!
//! Canned outputs are matched by command-line prefix; every invocation is
//! recorded in order so flow tests can assert the exact command sequence.
//! Tools and files exist unless explicitly marked missing.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::exec::{CommandBackend, ExecOutput, Invocation};

/// Scripted backend recording every invocation.
pub struct MockBackend {
    rules: Vec<(String, ExecOutput)>,
    missing_tools: HashSet<String>,
    missing_files: HashSet<PathBuf>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Backend where every command succeeds with empty output.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            missing_tools: HashSet::new(),
            missing_files: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `output` to any command line starting with `prefix`.
    /// Earlier rules win.
    pub fn respond(mut self, prefix: &str, output: ExecOutput) -> Self {
        self.rules.push((prefix.to_string(), output));
        self
    }

    /// Report `name` as not installed.
    pub fn without_tool(mut self, name: &str) -> Self {
        self.missing_tools.insert(name.to_string());
        self
    }

    /// Report `path` as not existing.
    pub fn without_file(mut self, path: &str) -> Self {
        self.missing_files.insert(PathBuf::from(path));
        self
    }

    /// The true command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandBackend for MockBackend {
    async fn run(&self, invocation: &Invocation) -> io::Result<ExecOutput> {
        let line = invocation.command_line();
        self.calls.lock().unwrap().push(line.clone());
        for (prefix, output) in &self.rules {
            if line.starts_with(prefix.as_str()) {
                return Ok(output.clone());
            }
        }
        Ok(ExecOutput::ok())
    }

    fn find_tool(&self, name: &str) -> Option<PathBuf> {
        if self.missing_tools.contains(name) {
            None
        } else {
            Some(PathBuf::from(format!("/usr/bin/{name}")))
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        !self.missing_files.contains(path)
    }
}
