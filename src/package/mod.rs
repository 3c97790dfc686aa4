//! Package version lookup
//!
//! This module provides a trait-based abstraction over the system package
//! database, allowing the real `rpm` backed implementation to be swapped for
//! an in-memory one in tests.
//!
//! # Overview
//!
//! - [PackageDatabase]: queries for installed packages and package files
//! - [rpm::RpmDatabase]: the real implementation, shelling out to `rpm`
//! - [mock::MockPackageDatabase]: a mock implementation for testing
//! - [PackageVersionResolver]: installed version first, then the downloaded
//!   binary packages in the build's repository directories

pub mod mock;
pub mod rpm;

pub use mock::MockPackageDatabase;
pub use rpm::RpmDatabase;

use crate::error::{ReplaceError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Name and version read from a binary package file
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

/// Common package query trait
///
/// Implementations report a package that is not installed as `Ok(None)`.
/// Every other query failure is an `Err`.
pub trait PackageDatabase: Send + Sync {
    /// Version of an installed package, `None` when it is not installed.
    fn installed_version(&self, name: &str) -> Result<Option<String>>;

    /// Name and version stored in a package file, `None` if the query
    /// output lacks either field.
    fn package_file_info(&self, path: &Path) -> Result<Option<PackageInfo>>;
}

/// Where a resolved version came from
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSource {
    Installed,
    LocalPackage(PathBuf),
}

/// A package version together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub package: String,
    pub version: String,
    pub source: VersionSource,
}

/// Resolves package versions against a [PackageDatabase]
pub struct PackageVersionResolver<'a, D: PackageDatabase + ?Sized> {
    db: &'a D,
    repos_dirs: Vec<PathBuf>,
}

impl<'a, D: PackageDatabase + ?Sized> PackageVersionResolver<'a, D> {
    pub fn new(db: &'a D, repos_dirs: Vec<PathBuf>) -> Self {
        PackageVersionResolver { db, repos_dirs }
    }

    /// Finds the version of `name`.
    ///
    /// The installed package wins. Otherwise the binary packages under the
    /// repository directories are inspected in path order and the first one
    /// whose name matches is used.
    pub fn resolve(&self, name: &str) -> Result<ResolvedVersion> {
        if let Some(version) = self.db.installed_version(name)? {
            return Ok(ResolvedVersion {
                package: name.to_string(),
                version,
                source: VersionSource::Installed,
            });
        }

        for candidate in self.local_packages() {
            if let Some(info) = self.db.package_file_info(&candidate)? {
                if info.name == name {
                    return Ok(ResolvedVersion {
                        package: info.name,
                        version: info.version,
                        source: VersionSource::LocalPackage(candidate),
                    });
                }
            }
        }

        Err(ReplaceError::PackageNotFound {
            package: name.to_string(),
            searched: self
                .repos_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Binary package files below the repository directories, sorted by path.
    pub fn local_packages(&self) -> Vec<PathBuf> {
        let mut packages: Vec<PathBuf> = self
            .repos_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| {
                WalkBuilder::new(dir)
                    .standard_filters(false)
                    .follow_links(true)
                    .build()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
                    .map(|entry| entry.into_path())
                    .filter(|path| is_binary_package(path))
                    .collect::<Vec<_>>()
            })
            .collect();
        packages.sort();
        packages
    }
}

fn is_binary_package(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    name.ends_with(".rpm") && !name.ends_with(".src.rpm") && !name.ends_with(".nosrc.rpm")
}
