use crate::error::ReplaceError;
use std::str::FromStr;

/// How many leading components of a dotted version to keep.
///
/// Parsed from the `--parse-version` flag; only the exact lower-case
/// literals `major`, `minor` and `patch` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Major,
    Minor,
    Patch,
}

impl Granularity {
    /// Number of dot-separated fields kept at this granularity.
    pub fn components(&self) -> usize {
        match self {
            Granularity::Major => 1,
            Granularity::Minor => 2,
            Granularity::Patch => 3,
        }
    }
}

impl FromStr for Granularity {
    type Err = ReplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Granularity::Major),
            "minor" => Ok(Granularity::Minor),
            "patch" => Ok(Granularity::Patch),
            _ => Err(ReplaceError::InvalidFlagValue),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Granularity::Major => "major",
            Granularity::Minor => "minor",
            Granularity::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Truncates a dotted version string to the requested granularity.
///
/// Without a granularity the version is returned unchanged. A version with
/// fewer fields than requested is returned whole.
///
/// # Example
/// ```
/// use replace_using_package_version::version::{truncate_version, Granularity};
///
/// assert_eq!(truncate_version("1.2.3", Some(Granularity::Minor)), "1.2");
/// assert_eq!(truncate_version("2.4.51", None), "2.4.51");
/// ```
pub fn truncate_version(version: &str, granularity: Option<Granularity>) -> String {
    match granularity {
        None => version.to_string(),
        Some(granularity) => version
            .split('.')
            .take(granularity.components())
            .collect::<Vec<_>>()
            .join("."),
    }
}
