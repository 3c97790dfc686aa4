//! Build recipe inspection.
//!
//! When no file is named on the command line, the recipe the build worker is
//! about to build is used instead. The worker records it as `RECIPEFILE` in
//! `build.data`, relative to the source directory.

use crate::config::BuildLayout;
use crate::error::{ReplaceError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Kind of build recipe, decided from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    Dockerfile,
    RpmSpec,
    Other,
}

impl RecipeKind {
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let lower = name.to_lowercase();

        if lower == "dockerfile"
            || lower == "containerfile"
            || lower.starts_with("dockerfile.")
            || lower.ends_with(".dockerfile")
        {
            RecipeKind::Dockerfile
        } else if lower.ends_with(".spec") {
            RecipeKind::RpmSpec
        } else {
            RecipeKind::Other
        }
    }
}

fn assignment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)=(?:"([^"]*)"|'([^']*)'|(\S*))\s*$"#)
            .expect("build.data assignment pattern is valid")
    })
}

/// Parses the shell-style `KEY="value"` assignments of a `build.data` file.
pub fn parse_build_data(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let caps = assignment_regex().captures(line)?;
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            Some((caps[1].to_string(), value))
        })
        .collect()
}

/// Reads and parses a `build.data` file.
pub fn read_build_data(path: &Path) -> Result<HashMap<String, String>> {
    if !path.is_file() {
        return Err(ReplaceError::recipe(format!(
            "build data file {} not found, cannot locate the default build recipe",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_build_data(&content))
}

/// Path of the recipe being built: `{srcdir}/{RECIPEFILE}`.
pub fn default_recipe_path(layout: &BuildLayout) -> Result<PathBuf> {
    let data_path = layout.build_data();
    let data = read_build_data(&data_path)?;

    match data.get("RECIPEFILE") {
        Some(recipe) if !recipe.is_empty() => Ok(layout.srcdir().join(recipe)),
        _ => Err(ReplaceError::recipe(format!(
            "RECIPEFILE is not set in {}",
            data_path.display()
        ))),
    }
}

/// Image reference of the final stage of a container build file.
///
/// Options such as `--platform=...` and a trailing `AS name` are skipped.
/// Lines continuing a previous `\` line and heredoc bodies are not
/// instructions and are ignored.
pub fn base_image(content: &str) -> Option<String> {
    let mut image = None;
    let mut continued = false;
    let mut heredoc: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(terminator) = &heredoc {
            if trimmed == terminator {
                heredoc = None;
            }
            continue;
        }

        let is_continuation = continued;
        continued = trimmed.ends_with('\\');
        if is_continuation || trimmed.starts_with('#') {
            continue;
        }

        heredoc = heredoc_terminator(trimmed);

        let mut words = trimmed.split_whitespace();
        if words
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("FROM"))
        {
            if let Some(reference) = words.find(|word| !word.starts_with("--")) {
                image = Some(reference.to_string());
            }
        }
    }

    image
}

/// Terminator word of a `<<EOF`, `<<-EOF` or `<<"EOF"` heredoc on this line.
fn heredoc_terminator(line: &str) -> Option<String> {
    let (_, rest) = line.split_once("<<")?;
    let rest = rest.trim_start_matches('-');
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let word = rest
        .split_whitespace()
        .next()?
        .trim_matches(|c| c == '"' || c == '\'');
    (!word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .then(|| word.to_string())
}

/// Package name derived from an image reference: the final repository path
/// segment with any tag or digest removed. `scratch` has no package.
pub fn package_from_image(image: &str) -> Option<String> {
    let without_digest = image.split('@').next().unwrap_or(image);
    let last_segment = without_digest.rsplit('/').next().unwrap_or(without_digest);
    let name = last_segment.split(':').next().unwrap_or(last_segment);

    if name.is_empty() || name == "scratch" {
        None
    } else {
        Some(name.to_string())
    }
}

/// Value of the `Name:` tag of an RPM spec file.
pub fn spec_name(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (tag, value) = line.split_once(':')?;
        if tag.trim().eq_ignore_ascii_case("name") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Name of the package a recipe is built on.
pub fn base_package(recipe: &Path) -> Result<String> {
    if !recipe.is_file() {
        return Err(ReplaceError::FileNotFound(recipe.to_path_buf()));
    }
    let content = fs::read_to_string(recipe)?;

    let package = match RecipeKind::detect(recipe) {
        RecipeKind::Dockerfile => base_image(&content)
            .as_deref()
            .and_then(package_from_image),
        RecipeKind::RpmSpec => spec_name(&content),
        RecipeKind::Other => {
            return Err(ReplaceError::recipe(format!(
                "unsupported recipe type {}, pass --package explicitly",
                recipe.display()
            )))
        }
    };

    package.ok_or_else(|| {
        ReplaceError::recipe(format!(
            "cannot determine the base package of {}",
            recipe.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_data() {
        let content = "RECIPEFILE=\"Dockerfile\"\nBUILD_JOBS=\"12\"\nBUILD_RPMS=\"\"\n# comment\nBUILD_DIST='/.build/build.dist'\nPLAIN=value\n";
        let data = parse_build_data(content);
        assert_eq!(data.get("RECIPEFILE").map(String::as_str), Some("Dockerfile"));
        assert_eq!(data.get("BUILD_JOBS").map(String::as_str), Some("12"));
        assert_eq!(data.get("BUILD_RPMS").map(String::as_str), Some(""));
        assert_eq!(
            data.get("BUILD_DIST").map(String::as_str),
            Some("/.build/build.dist")
        );
        assert_eq!(data.get("PLAIN").map(String::as_str), Some("value"));
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn test_recipe_kind_detection() {
        assert_eq!(RecipeKind::detect(Path::new("/a/Dockerfile")), RecipeKind::Dockerfile);
        assert_eq!(RecipeKind::detect(Path::new("Containerfile")), RecipeKind::Dockerfile);
        assert_eq!(RecipeKind::detect(Path::new("Dockerfile.sle")), RecipeKind::Dockerfile);
        assert_eq!(RecipeKind::detect(Path::new("app.dockerfile")), RecipeKind::Dockerfile);
        assert_eq!(RecipeKind::detect(Path::new("zypper.spec")), RecipeKind::RpmSpec);
        assert_eq!(RecipeKind::detect(Path::new("config.kiwi")), RecipeKind::Other);
    }

    #[test]
    fn test_base_image_uses_last_stage() {
        let content = "FROM registry.suse.com/bci/golang:1.21 AS builder\nRUN make\nFROM --platform=linux/amd64 registry.opensuse.org/opensuse/tumbleweed:latest\nLABEL VERSION=\"%%VERSION%%\"\n";
        assert_eq!(
            base_image(content).as_deref(),
            Some("registry.opensuse.org/opensuse/tumbleweed:latest")
        );
    }

    #[test]
    fn test_base_image_ignores_continuation_lines() {
        let content = "FROM registry.opensuse.org/opensuse/leap:15.5\nRUN python3 -c \"import sys\" && \\\n    from x import y \\\n    && true\nLABEL VERSION=\"%%VERSION%%\"\n";
        assert_eq!(
            base_image(content).as_deref(),
            Some("registry.opensuse.org/opensuse/leap:15.5")
        );
    }

    #[test]
    fn test_base_image_ignores_heredoc_body() {
        let content = "FROM registry.opensuse.org/opensuse/tumbleweed\nRUN <<EOF cat > /app.py\nfrom os import path\nFROM inside heredoc\nEOF\nCMD [\"python3\", \"/app.py\"]\n";
        assert_eq!(
            base_image(content).as_deref(),
            Some("registry.opensuse.org/opensuse/tumbleweed")
        );
    }

    #[test]
    fn test_base_image_after_heredoc() {
        let content = "FROM builder-image AS build\nRUN <<-\"END\"\n  from a import b\n  END\nFROM registry.suse.com/bci/bci-base:15.5\n";
        assert_eq!(
            base_image(content).as_deref(),
            Some("registry.suse.com/bci/bci-base:15.5")
        );
    }

    #[test]
    fn test_shift_operator_is_not_heredoc() {
        assert_eq!(heredoc_terminator("RUN echo $((1 << 2))"), None);
        assert_eq!(heredoc_terminator("RUN cat <<EOF > /x").as_deref(), Some("EOF"));
    }

    #[test]
    fn test_base_image_missing() {
        assert_eq!(base_image("RUN true\n"), None);
    }

    #[test]
    fn test_package_from_image() {
        assert_eq!(
            package_from_image("registry.opensuse.org/opensuse/tumbleweed").as_deref(),
            Some("tumbleweed")
        );
        assert_eq!(
            package_from_image("localhost:5000/apache2:2.4").as_deref(),
            Some("apache2")
        );
        assert_eq!(
            package_from_image("nginx@sha256:abcdef").as_deref(),
            Some("nginx")
        );
        assert_eq!(package_from_image("scratch"), None);
    }

    #[test]
    fn test_spec_name() {
        let content = "# spec file\nName:           zypper\nVersion:        1.14.63\n";
        assert_eq!(spec_name(content).as_deref(), Some("zypper"));
        assert_eq!(spec_name("Version: 1\n"), None);
    }
}
