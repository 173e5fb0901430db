//! Command line argument parsing.

use error::{ErrorKind, Result};

use gocover::Order;

use clap::ArgMatches;
use termcolor::ColorChoice;

use std::io::{IsTerminal, stdout};
use std::path::PathBuf;

/// Options of a report run, extracted from the command line.
#[derive(Debug)]
pub struct ReportConfig {
    /// Path to the profile written by `go test -coverprofile`.
    pub profile_path: PathBuf,
    /// Order of the files in the report.
    pub order: Order,
    /// Whether the report is colored.
    pub color_choice: ColorChoice,
}

impl ReportConfig {
    pub fn parse(matches: &ArgMatches) -> Result<ReportConfig> {
        let profile_path = matches.value_of_os("profile").expect("required argument").into();
        let order = if matches.is_present("reverse") {
            Order::Descending
        } else {
            Order::Ascending
        };
        let color_choice = parse_color_choice(matches.value_of("color").unwrap_or("auto"))?;
        Ok(ReportConfig {
            profile_path,
            order,
            color_choice,
        })
    }
}

/// Parses the `--color` option. `auto` only colors the report when writing to a terminal.
fn parse_color_choice(value: &str) -> Result<ColorChoice> {
    Ok(match value {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        "auto" if stdout().is_terminal() => ColorChoice::Auto,
        "auto" => ColorChoice::Never,
        _ => bail!(ErrorKind::InvalidColorChoice(value.to_owned())),
    })
}

#[test]
fn test_parse_color_choice() {
    assert_eq!(parse_color_choice("always").unwrap(), ColorChoice::Always);
    assert_eq!(parse_color_choice("never").unwrap(), ColorChoice::Never);
    assert!(parse_color_choice("auto").is_ok());
    assert!(parse_color_choice("sometimes").is_err());
}
