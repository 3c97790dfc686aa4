use crate::error::{ReplaceError, Result};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// Checks that the input file and the output directory both exist.
///
/// The file is checked first, so a run with both missing reports the file.
pub fn validate_paths(file: &Path, outdir: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(ReplaceError::FileNotFound(file.to_path_buf()));
    }
    if !outdir.is_dir() {
        return Err(ReplaceError::OutputDirNotFound(outdir.to_path_buf()));
    }
    Ok(())
}

/// Compiles the user-supplied pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ReplaceError::InvalidRegex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Replaces every match of `regex` with `replacement`, inserted verbatim.
pub fn substitute(content: &str, regex: &Regex, replacement: &str) -> String {
    regex.replace_all(content, NoExpand(replacement)).into_owned()
}

/// Where the rewritten copy of `file` lands: `{outdir}/{basename(file)}`.
pub fn output_path(file: &Path, outdir: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .ok_or_else(|| ReplaceError::FileNotFound(file.to_path_buf()))?;
    Ok(outdir.join(name))
}

/// Rewrites `file` into `outdir`, returning the path written.
///
/// When `outdir` is the file's own directory the file is replaced in place.
pub fn rewrite_file(file: &Path, outdir: &Path, regex: &Regex, replacement: &str) -> Result<PathBuf> {
    validate_paths(file, outdir)?;

    let content = fs::read_to_string(file)?;
    let rewritten = substitute(&content, regex, replacement);

    let target = output_path(file, outdir)?;
    fs::write(&target, rewritten)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str =
        "This is a testfile with some replacements like %%MINOR%%\n%NEVR%\nand a footer?\n";

    #[test]
    fn test_substitute_all_matches() {
        let regex = compile_pattern("%NEVR%").unwrap();
        let out = substitute("%NEVR% and %NEVR%", &regex, "1.14");
        assert_eq!(out, "1.14 and 1.14");
    }

    #[test]
    fn test_substitute_leaves_other_content_alone() {
        let regex = compile_pattern("footer").unwrap();
        let out = substitute(SAMPLE, &regex, "header");
        assert_eq!(
            out,
            "This is a testfile with some replacements like %%MINOR%%\n%NEVR%\nand a header?\n"
        );
    }

    #[test]
    fn test_replacement_is_literal() {
        let regex = compile_pattern("(foot)er").unwrap();
        assert_eq!(substitute("a footer", &regex, "$1-$0"), "a $1-$0");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = compile_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, ReplaceError::InvalidRegex { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_validate_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("non_existent");
        let err = validate_paths(&missing, temp.path()).unwrap_err();
        assert_eq!(err.to_string(), format!("File {} not found", missing.display()));
    }

    #[test]
    fn test_validate_missing_outdir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("testfile");
        fs::write(&file, SAMPLE).unwrap();
        let missing = temp.path().join("non_existent");
        let err = validate_paths(&file, &missing).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Output directory {} not found", missing.display())
        );
    }

    #[test]
    fn test_file_is_checked_before_outdir() {
        let err = validate_paths(Path::new("/nonexistent/file"), Path::new("/nonexistent/dir"))
            .unwrap_err();
        assert!(matches!(err, ReplaceError::FileNotFound(_)));
    }

    #[test]
    fn test_rewrite_file_writes_basename_into_outdir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let file = src.path().join("testfile");
        fs::write(&file, SAMPLE).unwrap();

        let regex = compile_pattern("%NEVR%").unwrap();
        let written = rewrite_file(&file, out.path(), &regex, "1.14").unwrap();

        assert_eq!(written, out.path().join("testfile"));
        let content = fs::read_to_string(&written).unwrap();
        assert_eq!(content.lines().nth(1), Some("1.14"));
        // source untouched
        assert_eq!(fs::read_to_string(&file).unwrap(), SAMPLE);
    }

    #[test]
    fn test_rewrite_is_idempotent_on_same_source() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let file = src.path().join("Dockerfile");
        fs::write(&file, "LABEL VERSION=\"%%VERSION%%\"\n").unwrap();
        let regex = compile_pattern("%%VERSION%%").unwrap();

        let first = rewrite_file(&file, out.path(), &regex, "2.4.51").unwrap();
        let first_content = fs::read_to_string(&first).unwrap();
        let second = rewrite_file(&file, out.path(), &regex, "2.4.51").unwrap();
        assert_eq!(first_content, fs::read_to_string(&second).unwrap());
        assert_eq!(first_content, "LABEL VERSION=\"2.4.51\"\n");
    }
}
