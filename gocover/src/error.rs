//! Errors related to the `gocover` crate.
//!
//! Please see documentation of the [`error-chain` crate](https://docs.rs/error-chain/0.12.0/error_chain/) for detailed
//! usage.

use std::io;

error_chain! {
    foreign_links {
        Io(io::Error) /** Wrapper of standard I/O error. */;
        Json(::serde_json::Error) /** Wrapper of JSON error, raised when decoding `go list` output. */;
    }

    errors {
        /// The coverage profile is not in the `go test -coverprofile` format.
        ProfileParse(line: usize, reason: String) {
            description("malformed coverage profile")
            display("malformed coverage profile at line {}: {}", line, reason)
        }

        /// Two blocks of the same range disagree on the number of statements they contain.
        InconsistentStatements(expected: u32, actual: u32) {
            description("inconsistent statement count")
            display("inconsistent NumStmt: changed from {} to {}", expected, actual)
        }

        /// The `go` tool could not be started, or exited with a failure status.
        ToolInvocation(tool: String, detail: String) {
            description("cannot run go list")
            display("cannot run `{} list`: {}", tool, detail)
        }

        /// The package of a profiled file is absent from the `go list` output.
        PackageNotFound(file: String) {
            description("package not found")
            display("did not find package for {} in go list output", file)
        }

        /// `go list` reported an error while resolving the package of a profiled file.
        PackageResolution(file: String, message: String) {
            description("cannot resolve package")
            display("cannot resolve package for {}: {}", file, message)
        }

        /// A Go source file could not be parsed.
        SourceParse(path: String, line: usize, column: usize) {
            description("syntax error in Go source")
            display("{}:{}:{}: syntax error", path, line, column)
        }
    }
}
