use crate::error::{ReplaceError, Result};
use crate::package::{PackageDatabase, PackageInfo};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

/// Package database backed by the `rpm` command line tool
pub struct RpmDatabase {
    program: String,
}

impl RpmDatabase {
    pub fn new() -> Self {
        Self::with_program("rpm")
    }

    /// Use a different `rpm` executable, e.g. a wrapper script.
    pub fn with_program(program: impl Into<String>) -> Self {
        RpmDatabase {
            program: program.into(),
        }
    }

    fn query<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new(&self.program).args(args).output().map_err(|e| {
            ReplaceError::package_query(format!("failed to execute {}: {}", self.program, e))
        })
    }
}

impl Default for RpmDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageDatabase for RpmDatabase {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let output = self.query(["-q", "--qf", "%{version}", name])?;

        if !output.status.success() {
            if is_not_installed(&output) {
                return Ok(None);
            }
            return Err(query_failure(&self.program, &output));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!version.is_empty()).then_some(version))
    }

    fn package_file_info(&self, path: &Path) -> Result<Option<PackageInfo>> {
        let output = self.query([
            OsStr::new("-qp"),
            OsStr::new("--qf"),
            OsStr::new("%{name}\\n%{version}"),
            path.as_os_str(),
        ])?;

        if !output.status.success() {
            return Err(ReplaceError::package_query(format!(
                "cannot read {}: {}",
                path.display(),
                diagnostics(&output)
            )));
        }

        Ok(parse_name_version(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// rpm reports "package NAME is not installed" on stdout and exits 1.
fn is_not_installed(output: &Output) -> bool {
    String::from_utf8_lossy(&output.stdout).contains("is not installed")
        || String::from_utf8_lossy(&output.stderr).contains("is not installed")
}

fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("exit code {}", output.status.code().unwrap_or(-1))
}

fn query_failure(program: &str, output: &Output) -> ReplaceError {
    ReplaceError::package_query(format!("{} failed: {}", program, diagnostics(output)))
}

/// Parses the two-line `name\nversion` output of a package file query.
fn parse_name_version(stdout: &str) -> Option<PackageInfo> {
    let mut lines = stdout.lines().map(str::trim);
    let name = lines.next().filter(|l| !l.is_empty())?;
    let version = lines.next().filter(|l| !l.is_empty())?;
    Some(PackageInfo {
        name: name.to_string(),
        version: version.to_string(),
    })
}
