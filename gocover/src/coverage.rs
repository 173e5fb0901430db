//! Attribution of coverage blocks to functions.
//!
//! Coverage blocks and function extents come from two unrelated sources: the profile written by the test binary, and
//! the syntax tree of the source file. A block is attributed to a function when their ranges intersect. Blocks never
//! straddle a function boundary, so a block is either wholly inside a function or wholly outside.

use error::*;
use extent::{Extractor, FunctionExtent};
use locate::PackageMap;
use profile::{CoverageBlock, Profile};
use report::FileCoverage;

impl FunctionExtent {
    /// Counts the statements of this function which were executed, and the total number of statements.
    ///
    /// `blocks` must be sorted by start position, which the profile reader guarantees. The scan stops at the first
    /// block starting after the function.
    ///
    /// A function with no statements reports a total of 1 so that it counts as uncovered instead of dividing by zero.
    pub fn coverage(&self, blocks: &[CoverageBlock]) -> (i64, i64) {
        let mut covered = 0;
        let mut total = 0;
        for b in blocks {
            if b.start_line > self.end_line || (b.start_line == self.end_line && b.start_col >= self.end_col) {
                break;
            }
            if b.end_line < self.start_line || (b.end_line == self.start_line && b.end_col <= self.start_col) {
                continue;
            }
            total += i64::from(b.num_stmt);
            if b.count > 0 {
                covered += i64::from(b.num_stmt);
            }
        }
        if total == 0 {
            total = 1;
        }
        (covered, total)
    }
}

/// Sums the coverage of every function of a file.
pub fn file_coverage(functions: &[FunctionExtent], blocks: &[CoverageBlock]) -> (i64, i64) {
    functions.iter().fold((0, 0), |(covered, total), f| {
        let (n, d) = f.coverage(blocks);
        trace!("{}: {}/{}", f.name, n, d);
        (covered + n, total + d)
    })
}

/// Computes the [`FileCoverage`] of every profile, in the order of `profiles`.
///
/// Every file is located through `packages` and parsed. The first failure aborts the whole computation.
///
/// [`FileCoverage`]: ../report/struct.FileCoverage.html
pub fn summarize(profiles: &[Profile], packages: &PackageMap) -> Result<Vec<FileCoverage>> {
    let mut extractor = Extractor::new();
    profiles
        .iter()
        .map(|profile| -> Result<FileCoverage> {
            let path = packages.resolve(&profile.file_name)?;
            debug!("{} => {}", profile.file_name, path.display());
            let functions = extractor.extract(&path)?;
            let (covered, total) = file_coverage(&functions, &profile.blocks);
            Ok(FileCoverage::new(path.to_string_lossy().into_owned(), covered, total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile::Mode;

    fn function(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> FunctionExtent {
        FunctionExtent {
            name: "f".to_owned(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    fn block(start: (u32, u32), end: (u32, u32), num_stmt: u32, count: u64) -> CoverageBlock {
        CoverageBlock {
            start_line: start.0,
            start_col: start.1,
            end_line: end.0,
            end_col: end.1,
            num_stmt,
            count,
        }
    }

    #[test]
    fn test_blocks_inside_function() {
        let f = function(3, 1, 20, 2);
        let blocks = [
            block((3, 14), (5, 3), 2, 1),
            block((5, 3), (7, 4), 3, 0),
            block((7, 4), (12, 10), 4, 9),
            block((12, 10), (20, 2), 1, 0),
        ];
        let (covered, total) = f.coverage(&blocks);
        let uncovered = blocks.iter().filter(|b| b.count == 0).map(|b| i64::from(b.num_stmt)).sum::<i64>();
        assert_eq!(total, blocks.iter().map(|b| i64::from(b.num_stmt)).sum::<i64>());
        assert_eq!(covered, 6);
        assert_eq!(covered + uncovered, total);
    }

    #[test]
    fn test_empty_function_counts_as_one_statement() {
        assert_eq!(function(3, 1, 3, 16).coverage(&[]), (0, 1));
        let elsewhere = [block((10, 14), (12, 2), 5, 1)];
        assert_eq!(function(3, 1, 3, 16).coverage(&elsewhere), (0, 1));
    }

    #[test]
    fn test_block_ending_at_function_start() {
        let f = function(10, 5, 20, 2);
        assert_eq!(f.coverage(&[block((8, 1), (10, 5), 4, 1)]), (0, 1));
        assert_eq!(f.coverage(&[block((8, 1), (10, 6), 4, 1)]), (4, 4));
        assert_eq!(f.coverage(&[block((8, 1), (9, 80), 4, 1)]), (0, 1));
    }

    #[test]
    fn test_block_starting_at_function_end() {
        let f = function(10, 5, 20, 2);
        assert_eq!(f.coverage(&[block((20, 2), (22, 1), 4, 1)]), (0, 1));
        assert_eq!(f.coverage(&[block((20, 1), (22, 1), 4, 1)]), (4, 4));
        assert_eq!(f.coverage(&[block((21, 1), (22, 1), 4, 1)]), (0, 1));
    }

    #[test]
    fn test_scan_stops_after_function() {
        let f = function(1, 1, 5, 2);
        // Out of order on purpose: a sorted profile would never place this block last.
        let blocks = [block((1, 10), (5, 2), 2, 1), block((6, 1), (7, 2), 3, 0), block((2, 1), (3, 1), 5, 0)];
        assert_eq!(f.coverage(&blocks), (2, 2));
    }

    #[test]
    fn test_two_functions_in_one_file() {
        let functions = [function(3, 1, 7, 2), function(9, 1, 12, 2)];
        let blocks = [block((3, 19), (7, 2), 3, 5), block((9, 10), (12, 2), 2, 0)];
        assert_eq!(file_coverage(&functions, &blocks), (3, 5));
        assert_eq!(file_coverage(&[], &blocks), (0, 0));
    }

    #[test]
    fn test_unresolved_package_aborts() {
        let profiles = [Profile {
            file_name: "example.com/missing/x.go".to_owned(),
            mode: Mode::Set,
            blocks: vec![block((3, 10), (5, 2), 1, 1)],
        }];
        let packages = PackageMap::from_json(b"").unwrap();
        match *summarize(&profiles, &packages).unwrap_err().kind() {
            ErrorKind::PackageNotFound(ref file) => assert_eq!(file, "example.com/missing/x.go"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }
}
