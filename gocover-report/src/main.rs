//! `gocover-report` summarizes the profile written by `go test -coverprofile` as the statement coverage of every source
//! file, sorted from the least to the best covered, followed by the total.
//!
//! ```text
//! $ go test -coverprofile=cover.out ./...
//! $ gocover-report cover.out
//! /home/gopher/src/shapes/perimeter.go    0.0%
//! /home/gopher/src/shapes/area.go         60.0%
//! /home/gopher/src/cmd/main.go            100.0%
//!
//! Total:                                  58.3%
//! ```

#![recursion_limit = "128"] // needed for error_chain.
#![allow(unknown_lints, dangerous_implicit_autorefs)] // triggered inside clap 2.x `crate_authors!`.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate env_logger;
extern crate gocover;
extern crate termcolor;

#[macro_use]
mod ui;
mod argparse;
mod error;

use argparse::ReportConfig;
use error::{Result, ResultExt};

use gocover::{PackageMap, Report, find_go, profile, summarize};

use clap::ArgMatches;
use termcolor::StandardStream;

use std::process::exit;

/// Program entry. Calls [`run()`] and prints any error returned to `stderr`.
///
/// [`run()`]: ./fn.run.html
fn main() {
    if let Err(error) = run() {
        ui::print_error(&error).expect("error while printing error 🤷");
        exit(1);
    }
}

/// Runs the `gocover-report` program.
///
/// Nothing is printed to `stdout` unless every file has been summarized successfully.
fn run() -> Result<()> {
    let matches = parse_args();
    env_logger::init();

    let config = ReportConfig::parse(&matches)?;
    debug!("config = {:?}", config);

    let profiles = profile::open(&config.profile_path).chain_err(|| format!("cannot read coverage profile `{}`", config.profile_path.display()))?;
    if profiles.is_empty() {
        warning!("no coverage blocks found in `{}`", config.profile_path.display());
    }

    let packages = PackageMap::query(&find_go(), &profiles)?;
    let files = summarize(&profiles, &packages)?;
    let report = Report::new(files, config.order);

    let stream = StandardStream::stdout(config.color_choice);
    report.render(stream.lock())?;
    Ok(())
}

/// Parses the command line arguments using `clap`.
fn parse_args() -> ArgMatches<'static> {
    clap_app!(gocover_report =>
        (bin_name: "gocover-report")
        (author: crate_authors!(", "))
        (about: crate_description!())
        (version: crate_version!())
        (@setting DeriveDisplayOrder)
        (@arg profile: +required "Coverage profile written by `go test -coverprofile`")
        (@arg reverse: -r --reverse "List the best covered files first")
        (@arg color: --color [WHEN] possible_values(&["auto", "always", "never"]) "Coloring of the report, default to 'auto'")
    ).get_matches()
}
