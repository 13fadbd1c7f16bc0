//! pyenv Python version manager wrapper.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hon_runner::{Invocation, ToolRunner};
use regex::Regex;
use tracing::{debug, info};

use crate::error::{ToolError, ToolResult};
use crate::version::{PythonVersion, VersionConstraints};

/// File pyenv reads the local Python version from.
pub const VERSION_FILE: &str = ".python-version";

const AVAILABLE_HEADER: &str = "Available versions:";

/// Drives the `pyenv` executable for one working directory.
pub struct Pyenv {
    executable: String,
    root: PathBuf,
    working_dir: PathBuf,
    python_version: Option<String>,
    runner: Arc<dyn ToolRunner>,
}

impl Pyenv {
    /// Create a wrapper, picking up the version pinned in `.python-version`.
    pub fn new(
        executable: impl Into<String>,
        root: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        let working_dir = working_dir.into();
        let python_version = fs::read_to_string(working_dir.join(VERSION_FILE))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            executable: executable.into(),
            root: root.into(),
            working_dir,
            python_version,
            runner,
        }
    }

    /// `$PYENV_ROOT`, falling back to `~/.pyenv`.
    pub fn default_root() -> PathBuf {
        if let Some(root) = std::env::var_os("PYENV_ROOT") {
            return PathBuf::from(root);
        }
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(".pyenv")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The Python version commands run under, if one is selected.
    pub fn python_version(&self) -> Option<&str> {
        self.python_version.as_deref()
    }

    fn command(&self) -> Invocation {
        Invocation::new(&self.executable).cwd(&self.working_dir)
    }

    /// Versions already installed under the pyenv root.
    pub fn installed_versions(&self, allow_prerelease: bool) -> ToolResult<Vec<PythonVersion>> {
        let output = self.runner.output(&self.command().arg("versions"))?;
        let pattern = Regex::new(r"^\*?\s*(\S+)").expect("version line pattern is valid");

        Ok(output
            .lines()
            .filter_map(|line| pattern.captures(line))
            .filter_map(|caps| PythonVersion::parse(&caps[1], allow_prerelease))
            .collect())
    }

    /// Versions pyenv knows how to install.
    pub fn available_versions(&self, allow_prerelease: bool) -> ToolResult<Vec<PythonVersion>> {
        let output = self
            .runner
            .output(&self.command().args(["install", "--list"]))?;
        let mut lines = output.lines();

        match lines.next().map(str::trim) {
            Some(AVAILABLE_HEADER) => {}
            other => {
                return Err(ToolError::UnexpectedOutput {
                    tool: self.executable.clone(),
                    message: format!("expected '{}', got {:?}", AVAILABLE_HEADER, other),
                })
            }
        }

        Ok(lines
            .filter_map(|line| PythonVersion::parse(line, allow_prerelease))
            .collect())
    }

    /// Make sure a version matching `constraint` is installed and return it.
    ///
    /// Prefers the newest installed match; otherwise installs the newest
    /// available match. The first ensured version becomes the selected one
    /// when none was pinned.
    pub fn ensure_python(
        &mut self,
        constraint: &str,
        allow_prerelease: bool,
    ) -> ToolResult<PythonVersion> {
        let constraints = VersionConstraints::parse(constraint)?;

        let installed = self.installed_versions(allow_prerelease)?;
        let version = match constraints.select(&installed) {
            Some(version) => {
                debug!("Python {} already installed for {}", version, constraint);
                version
            }
            None => {
                let available = self.available_versions(allow_prerelease)?;
                let version = constraints
                    .select(&available)
                    .ok_or_else(|| ToolError::NoMatchingPython(constraint.to_string()))?;
                self.install_python(&version)?;
                version
            }
        };

        if self.python_version.is_none() {
            self.python_version = Some(version.to_string());
        }
        Ok(version)
    }

    pub fn install_python(&self, version: &PythonVersion) -> ToolResult<()> {
        info!("Installing Python {}", version);
        self.runner
            .run(&self.command().args(["install", &version.to_string()]))?;
        Ok(())
    }

    /// Pin `version` for the working directory (writes `.python-version`).
    pub fn local(&mut self, version: &PythonVersion) -> ToolResult<()> {
        let version = version.to_string();
        self.runner
            .run(&self.command().args(["local", &version]))?;
        self.python_version = Some(version);
        Ok(())
    }

    /// Create a pyenv-virtualenv environment, optionally for a constrained Python.
    pub fn create_virtualenv(&mut self, name: &str, python: Option<&str>) -> ToolResult<()> {
        let mut cmd = self.command().arg("virtualenv");
        if let Some(constraint) = python {
            let version = self.ensure_python(constraint, true)?;
            cmd = cmd.arg(version.to_string());
        }
        self.runner.run(&cmd.arg(name))?;
        Ok(())
    }

    /// Run `cmd` through `pyenv exec` under the selected version.
    pub fn exec(&self, cmd: &[String]) -> ToolResult<()> {
        let mut invocation = self.command().arg("exec").args(cmd);
        if let Some(version) = &self.python_version {
            invocation = invocation.env("PYENV_VERSION", version);
        }
        self.runner.run(&invocation)?;
        Ok(())
    }

    /// Path of `executable` inside the selected version's `bin` directory.
    pub fn bin(&self, executable: &str) -> Option<PathBuf> {
        self.python_version.as_ref().map(|version| {
            self.root
                .join("versions")
                .join(version)
                .join("bin")
                .join(executable)
        })
    }
}
