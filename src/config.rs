use crate::error::{ReplaceError, Result};
use crate::version::Granularity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable the build worker sets to the `build.dist` path.
pub const BUILD_DIST_ENV: &str = "BUILD_DIST";

const DEFAULT_BUILD_DIST: &str = "/.build/build.dist";
const DEFAULT_SRCDIR: &str = "/.build-srcdir";
const CONFIG_FILE_NAME: &str = "replace_using_package_version.toml";

/// Everything a single run needs, built once from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// File to rewrite; the default build recipe when absent
    pub file: Option<PathBuf>,

    /// Directory the rewritten file is written to
    pub outdir: PathBuf,

    /// Pattern whose matches are replaced
    pub regex: String,

    /// Package whose version is substituted
    pub package: Option<String>,

    /// Literal replacement, bypasses version resolution
    pub replacement: Option<String>,

    /// Truncation applied to the resolved version
    pub granularity: Option<Granularity>,
}

/// Filesystem layout of the build worker.
///
/// Every field can be overridden from a TOML file; unset fields fall back to
/// the standard build-root locations.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct BuildLayout {
    #[serde(default)]
    pub build_dist: Option<PathBuf>,

    #[serde(default)]
    pub build_data: Option<PathBuf>,

    #[serde(default)]
    pub srcdir: Option<PathBuf>,

    #[serde(default)]
    pub repos_dirs: Option<Vec<PathBuf>>,
}

impl BuildLayout {
    /// Layout rooted at `srcdir`, with `build.data` at an explicit path.
    pub fn rooted(srcdir: impl Into<PathBuf>, build_data: impl Into<PathBuf>) -> Self {
        BuildLayout {
            build_dist: None,
            build_data: Some(build_data.into()),
            srcdir: Some(srcdir.into()),
            repos_dirs: None,
        }
    }

    /// Path of `build.dist`: configured, then `$BUILD_DIST`, then the default.
    pub fn build_dist(&self) -> PathBuf {
        if let Some(path) = &self.build_dist {
            return path.clone();
        }
        match std::env::var_os(BUILD_DIST_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => PathBuf::from(DEFAULT_BUILD_DIST),
        }
    }

    /// Path of `build.data`, which sits next to `build.dist` unless configured.
    pub fn build_data(&self) -> PathBuf {
        if let Some(path) = &self.build_data {
            return path.clone();
        }
        let dist = self.build_dist();
        dist.parent()
            .unwrap_or_else(|| Path::new("/"))
            .join("build.data")
    }

    pub fn srcdir(&self) -> PathBuf {
        self.srcdir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SRCDIR))
    }

    /// Directories searched for downloaded binary packages.
    pub fn repos_dirs(&self) -> Vec<PathBuf> {
        match &self.repos_dirs {
            Some(dirs) => dirs.clone(),
            None => vec![self.srcdir().join("repos")],
        }
    }
}

/// Loads the build layout from file or returns defaults.
///
/// Attempts to load the layout in the following order:
/// 1. Custom path provided as parameter
/// 2. `replace_using_package_version.toml` in the user config directory
/// 3. Default layout if no file found
///
/// # Returns
/// * `Ok(BuildLayout)` - Loaded or default layout
/// * `Err` - If the file exists but cannot be read or parsed
pub fn load_layout(config_path: Option<&Path>) -> Result<BuildLayout> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(BuildLayout::default());
        }
        path
    } else {
        return Ok(BuildLayout::default());
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        ReplaceError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| ReplaceError::config(format!("cannot parse {}: {}", path.display(), e)))
}
