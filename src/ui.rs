use crate::cli::RunReport;
use crate::package::VersionSource;

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

/// One line per step of a finished run.
pub fn report_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(recipe) = &report.recipe {
        lines.push(format!("Using build recipe {}", recipe.display()));
    }

    if let Some(resolved) = &report.resolved {
        let origin = match &resolved.source {
            VersionSource::Installed => "installed".to_string(),
            VersionSource::LocalPackage(path) => format!("from {}", path.display()),
        };
        lines.push(format!(
            "Package {} version {} ({})",
            resolved.package, resolved.version, origin
        ));
    }

    lines
}

pub fn display_report(report: &RunReport) {
    for line in report_lines(report) {
        display_status(&line);
    }
    display_success(&format!(
        "Replaced matches with '{}' in {}",
        report.replacement,
        report.output.display()
    ));
}
