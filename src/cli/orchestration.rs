//! Main workflow orchestration logic
//!
//! Keeps the replacement workflow separate from command line parsing so it
//! can be driven programmatically and tested against a mock package database.

use std::path::PathBuf;

use crate::config::{BuildLayout, Invocation};
use crate::error::Result;
use crate::package::{PackageDatabase, PackageVersionResolver, ResolvedVersion};
use crate::recipe;
use crate::rewriter;
use crate::version::truncate_version;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// File that was written
    pub output: PathBuf,

    /// Text inserted for every match
    pub replacement: String,

    /// Default build recipe, when no file was given
    pub recipe: Option<PathBuf>,

    /// Package version the replacement was derived from
    pub resolved: Option<ResolvedVersion>,
}

/// Main replacement workflow
///
/// 1. Pick the file to rewrite (explicit, or the default build recipe)
/// 2. Validate the file and output directory
/// 3. Use the literal replacement, or resolve and truncate a package version
/// 4. Write the substituted copy into the output directory
///
/// Nothing is written unless every earlier step succeeded.
pub fn run<D: PackageDatabase + ?Sized>(
    invocation: &Invocation,
    layout: &BuildLayout,
    db: &D,
) -> Result<RunReport> {
    let (file, recipe) = match &invocation.file {
        Some(file) => (file.clone(), None),
        None => {
            let recipe = recipe::default_recipe_path(layout)?;
            (recipe.clone(), Some(recipe))
        }
    };

    rewriter::validate_paths(&file, &invocation.outdir)?;
    let regex = rewriter::compile_pattern(&invocation.regex)?;

    let (replacement, resolved) = match &invocation.replacement {
        Some(literal) => (literal.clone(), None),
        None => {
            let package = match &invocation.package {
                Some(package) => package.clone(),
                None => {
                    let recipe_path = match &recipe {
                        Some(path) => path.clone(),
                        None => recipe::default_recipe_path(layout)?,
                    };
                    recipe::base_package(&recipe_path)?
                }
            };

            let resolver = PackageVersionResolver::new(db, layout.repos_dirs());
            let resolved = resolver.resolve(&package)?;
            (
                truncate_version(&resolved.version, invocation.granularity),
                Some(resolved),
            )
        }
    };

    let output = rewriter::rewrite_file(&file, &invocation.outdir, &regex, &replacement)?;

    Ok(RunReport {
        output,
        replacement,
        recipe,
        resolved,
    })
}
