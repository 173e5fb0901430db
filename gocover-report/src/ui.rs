//! Print colored text.
//!
//! Diagnostics go to `stderr` in the style of `cargo`, keeping `stdout` for the report itself.

use error::{Error, ErrorKind};

use gocover;

use termcolor::*;

use std::io::{Result, Write};

/// Prints a warning (yellow text), similar to cargo output.
macro_rules! warning {
    ($fmt:expr $(, $args:expr)*) => {{
        (|| -> ::std::io::Result<()> {
            use ::termcolor::*;
            use ::std::io::Write;
            let stream = StandardStream::stderr(ColorChoice::Auto);
            let mut lock = stream.lock();
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
            write!(lock, "warning: ")?;
            lock.reset()?;
            writeln!(lock, $fmt $(, $args)*)?;
            Ok(())
        })().expect("print warning")
    }}
}

/// Prints an error and the causes.
pub fn print_error(error: &Error) -> Result<()> {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();

    for (i, e) in error.iter().enumerate() {
        if i == 0 {
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_intense(true).set_bold(true))?;
            write!(lock, "error: ")?;
        } else {
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(lock, "caused by: ")?;
        }
        lock.reset()?;
        writeln!(lock, "{}", e)?;
    }
    if let Some(hint) = hint(error.kind()) {
        lock.set_color(ColorSpec::new().set_bold(true))?;
        write!(lock, "note: ")?;
        lock.reset()?;
        writeln!(lock, "{}", hint)?;
    }
    if let Some(backtrace) = error.backtrace() {
        writeln!(lock, "\n{:?}", backtrace)?;
    }
    Ok(())
}

/// Suggests how to fix an error caused by the environment rather than the input.
fn hint(kind: &ErrorKind) -> Option<&'static str> {
    match *kind {
        ErrorKind::Cover(gocover::ErrorKind::ToolInvocation(..)) => Some("set GOROOT, or make sure `go` is in PATH"),
        ErrorKind::Cover(gocover::ErrorKind::PackageNotFound(..)) | ErrorKind::Cover(gocover::ErrorKind::PackageResolution(..)) => {
            Some("run from inside the module the profile was recorded in")
        },
        _ => None,
    }
}
