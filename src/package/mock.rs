use crate::error::Result;
use crate::package::{PackageDatabase, PackageInfo};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock package database for testing without a real `rpm`
pub struct MockPackageDatabase {
    installed: HashMap<String, String>,
    files: HashMap<PathBuf, PackageInfo>,
}

impl MockPackageDatabase {
    /// Create a new empty mock database
    pub fn new() -> Self {
        MockPackageDatabase {
            installed: HashMap::new(),
            files: HashMap::new(),
        }
    }

    /// Mark a package as installed at the given version
    pub fn install(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.installed.insert(name.into(), version.into());
    }

    /// Register the metadata a package file reports
    pub fn add_package_file(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) {
        self.files.insert(
            path.into(),
            PackageInfo {
                name: name.into(),
                version: version.into(),
            },
        );
    }
}

impl Default for MockPackageDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageDatabase for MockPackageDatabase {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self.installed.get(name).cloned())
    }

    fn package_file_info(&self, path: &Path) -> Result<Option<PackageInfo>> {
        Ok(self.files.get(path).cloned())
    }
}
