use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use replace_using_package_version::cli;
use replace_using_package_version::config::{self, Invocation};
use replace_using_package_version::package::RpmDatabase;
use replace_using_package_version::ui;
use replace_using_package_version::version::Granularity;

const ABOUT: &str = "\
Replace a regex in a file with the version of an installed or downloaded package.

The version is looked up in the rpm database first and, if the package is not
installed, in the binary packages below the build's repos directory. Without
--file the build recipe named by RECIPEFILE in build.data is rewritten. With
--replacement the given text is inserted as is and no package is queried.";

#[derive(clap::Parser)]
#[command(
    name = "replace_using_package_version",
    about = ABOUT
)]
struct Args {
    #[arg(long, help = "File to rewrite (defaults to the build recipe)")]
    file: Option<PathBuf>,

    #[arg(long, help = "Directory the rewritten file is written to")]
    outdir: PathBuf,

    #[arg(long, help = "Regular expression to replace")]
    regex: String,

    #[arg(long, help = "Package whose version replaces the matches")]
    package: Option<String>,

    #[arg(
        long,
        value_name = "major|minor|patch",
        help = "Truncate the version to major, major.minor or major.minor.patch"
    )]
    parse_version: Option<String>,

    #[arg(long, help = "Literal replacement, skips the version lookup")]
    replacement: Option<String>,

    #[arg(long, help = "Build layout configuration file (TOML)")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        // --help
        Err(e) => e.exit(),
    };

    let granularity = match args.parse_version.as_deref().map(str::parse::<Granularity>) {
        None => None,
        Some(Ok(granularity)) => Some(granularity),
        Some(Err(e)) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let layout = match config::load_layout(args.config.as_deref()) {
        Ok(layout) => layout,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let invocation = Invocation {
        file: args.file,
        outdir: args.outdir,
        regex: args.regex,
        package: args.package,
        replacement: args.replacement,
        granularity,
    };

    let db = RpmDatabase::new();
    match cli::run(&invocation, &layout, &db) {
        Ok(report) => ui::display_report(&report),
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
