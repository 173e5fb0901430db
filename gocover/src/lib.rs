//! Per-file statement coverage of Go programs.
//!
//! `gocover` reads the profile written by `go test -coverprofile`, attributes its blocks to the top-level functions of
//! each source file, and summarizes the coverage of every file in a [`Report`].
//!
//! [`Report`]: ./report/struct.Report.html

#![recursion_limit = "128"] // needed for error_chain.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;
extern crate serde_json;
extern crate termcolor;
extern crate tree_sitter;
extern crate tree_sitter_go;

pub mod error;
pub mod profile;
pub mod extent;
pub mod coverage;
pub mod locate;
pub mod report;

pub use coverage::{file_coverage, summarize};
pub use error::{Error, ErrorKind, Result};
pub use extent::{Extractor, FunctionExtent};
pub use locate::{PackageMap, find_go};
pub use profile::{CoverageBlock, Mode, Profile};
pub use report::{Bucket, FileCoverage, Order, Report};
