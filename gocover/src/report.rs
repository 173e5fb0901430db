//! Coverage report.
//!
//! The [`Report`] lists the statement coverage of every file, sorted by percentage, followed by the total of all files.
//! Rows are colored by how well the file is covered:
//!
//! | Coverage | Color |
//! |----------|-------|
//! | ≤ 30% | red |
//! | 30% < x ≤ 70% | yellow |
//! | > 70% | green |
//!
//! [`Report`]: ./struct.Report.html

use termcolor::{Color, ColorSpec, WriteColor};

use std::cmp::{Ordering, max};
use std::io::{Result, Write};

/// Statement coverage of a single source file.
#[derive(Clone, PartialEq, Debug)]
pub struct FileCoverage {
    /// The resolved path of the source file.
    pub path: String,
    /// Number of statements executed at least once.
    pub covered: i64,
    /// Number of statements.
    pub total: i64,
    /// `covered / total` in percent.
    pub percent: f64,
}

impl FileCoverage {
    pub fn new(path: String, covered: i64, total: i64) -> FileCoverage {
        FileCoverage {
            path,
            covered,
            total,
            percent: percent(covered, total),
        }
    }
}

/// Computes `100 * covered / total`. A zero `total` is treated as 1, so an empty file is 0% covered.
fn percent(covered: i64, total: i64) -> f64 {
    100.0 * covered as f64 / max(total, 1) as f64
}

/// Sort order of the files in a report.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Order {
    /// Least covered files first.
    Ascending,
    /// Best covered files first.
    Descending,
}

impl Default for Order {
    fn default() -> Order {
        Order::Ascending
    }
}

/// Color bucket of a coverage percentage.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Bucket {
    Red,
    Yellow,
    Green,
}

impl Bucket {
    pub fn of(percent: f64) -> Bucket {
        if percent <= 30.0 {
            Bucket::Red
        } else if percent <= 70.0 {
            Bucket::Yellow
        } else {
            Bucket::Green
        }
    }

    pub fn color(self) -> Color {
        match self {
            Bucket::Red => Color::Red,
            Bucket::Yellow => Color::Yellow,
            Bucket::Green => Color::Green,
        }
    }
}

/// Sorted per-file coverage and the totals across all files.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Report {
    pub files: Vec<FileCoverage>,
    pub covered: i64,
    pub total: i64,
}

impl Report {
    /// Creates a report, sorting `files` by percentage. Files with equal percentage keep their relative order.
    pub fn new(mut files: Vec<FileCoverage>, order: Order) -> Report {
        files.sort_by(|a, b| {
            let ordering = a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal);
            match order {
                Order::Ascending => ordering,
                Order::Descending => ordering.reverse(),
            }
        });
        let covered = files.iter().map(|f| f.covered).sum();
        let total = files.iter().map(|f| f.total).sum();
        Report { files, covered, total }
    }

    /// The coverage of all files together, weighted by the number of statements of each file.
    pub fn total_percent(&self) -> f64 {
        percent(self.covered, self.total)
    }

    /// Writes the report as a tab-aligned table.
    pub fn render<W: WriteColor>(&self, mut out: W) -> Result<()> {
        let mut rows = self.files
            .iter()
            .map(|f| (Some(Bucket::of(f.percent)), vec![f.path.clone(), format_percent(f.percent)]))
            .collect::<Vec<_>>();
        rows.push((None, vec![String::new(), String::new(), String::new()]));
        let total_percent = self.total_percent();
        rows.push((Some(Bucket::of(total_percent)), vec!["Total:".to_owned(), format_percent(total_percent)]));

        let lines = align(&rows.iter().map(|r| r.1.as_slice()).collect::<Vec<_>>());
        for (&(bucket, _), line) in rows.iter().zip(lines) {
            match bucket {
                Some(bucket) => out.set_color(ColorSpec::new().set_fg(Some(bucket.color())))?,
                None => out.reset()?,
            }
            writeln!(out, "{}", line)?;
        }
        out.reset()?;
        out.flush()
    }
}

fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

const TAB_WIDTH: usize = 8;
const MIN_WIDTH: usize = 1;
const PADDING: usize = 1;

/// Aligns table cells into columns separated by tabs.
///
/// Every cell but the last of a row belongs to a column. A column spans a run of consecutive rows having a cell in it,
/// and is as wide as its widest cell plus padding, rounded up to a tab stop. This is the layout of Go's
/// `text/tabwriter` using `'\t'` as the padding character, so the output lines up with other Go tools.
fn align(rows: &[&[String]]) -> Vec<String> {
    let columns = rows.iter().map(|r| r.len().saturating_sub(1)).max().unwrap_or(0);
    let mut widths = rows.iter().map(|r| vec![0; r.len().saturating_sub(1)]).collect::<Vec<_>>();

    for column in 0..columns {
        let mut row = 0;
        while row < rows.len() {
            if rows[row].len() <= column + 1 {
                row += 1;
                continue;
            }
            let run_start = row;
            let mut width = MIN_WIDTH;
            while row < rows.len() && rows[row].len() > column + 1 {
                width = max(width, text_width(&rows[row][column]) + PADDING);
                row += 1;
            }
            for w in &mut widths[run_start..row] {
                w[column] = width;
            }
        }
    }

    rows.iter()
        .zip(widths)
        .map(|(cells, widths)| {
            let mut line = String::new();
            for (cell, &width) in cells.iter().zip(&widths) {
                line.push_str(cell);
                let cell_width = (width + TAB_WIDTH - 1) / TAB_WIDTH * TAB_WIDTH;
                let padding = cell_width - text_width(cell);
                for _ in 0..((padding + TAB_WIDTH - 1) / TAB_WIDTH) {
                    line.push('\t');
                }
            }
            if cells.len() > widths.len() {
                line.push_str(&cells[widths.len()]);
            }
            line
        })
        .collect()
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::{Ansi, NoColor};

    fn file(path: &str, covered: i64, total: i64) -> FileCoverage {
        FileCoverage::new(path.to_owned(), covered, total)
    }

    fn render_plain(report: &Report) -> String {
        let mut out = NoColor::new(Vec::new());
        report.render(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_buckets() {
        assert_eq!(Bucket::of(0.0), Bucket::Red);
        assert_eq!(Bucket::of(30.0), Bucket::Red);
        assert_eq!(Bucket::of(30.05), Bucket::Yellow);
        assert_eq!(Bucket::of(70.0), Bucket::Yellow);
        assert_eq!(Bucket::of(70.1), Bucket::Green);
        assert_eq!(Bucket::of(100.0), Bucket::Green);
    }

    #[test]
    fn test_empty_file_is_zero_percent() {
        let f = file("empty.go", 0, 0);
        assert_eq!(f.percent, 0.0);
    }

    #[test]
    fn test_sort_is_stable_and_monotonic() {
        let files = vec![
            file("a.go", 1, 2),
            file("b.go", 9, 10),
            file("c.go", 2, 4),
            file("d.go", 0, 3),
            file("e.go", 5, 10),
        ];

        let ascending = Report::new(files.clone(), Order::Ascending);
        let paths = ascending.files.iter().map(|f| &*f.path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["d.go", "a.go", "c.go", "e.go", "b.go"]);
        assert!(ascending.files.windows(2).all(|w| w[0].percent <= w[1].percent));

        let descending = Report::new(files, Order::Descending);
        let paths = descending.files.iter().map(|f| &*f.path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["b.go", "a.go", "c.go", "e.go", "d.go"]);
        assert!(descending.files.windows(2).all(|w| w[0].percent >= w[1].percent));
    }

    #[test]
    fn test_total_is_weighted() {
        let report = Report::new(vec![file("small.go", 1, 1), file("large.go", 1, 9)], Order::Ascending);
        assert_eq!((report.covered, report.total), (2, 10));
        assert_eq!(report.total_percent(), 20.0);
        assert!(report.total_percent() != (100.0 + 100.0 / 9.0) / 2.0);
    }

    #[test]
    fn test_render_single_file() {
        let report = Report::new(vec![file("/src/main.go", 3, 5)], Order::Ascending);
        assert_eq!(render_plain(&report), "/src/main.go\t60.0%\n\t\t\t\nTotal:\t\t60.0%\n");
    }

    #[test]
    fn test_render_alignment() {
        let report = Report::new(
            vec![
                file("a.go", 1, 3),
                file("example.com/long/path/to/file.go", 2, 3),
            ],
            Order::Ascending,
        );
        assert_eq!(
            render_plain(&report),
            "a.go\t\t\t\t\t33.3%\n\
             example.com/long/path/to/file.go\t66.7%\n\
             \t\t\t\t\t\t\n\
             Total:\t\t\t\t\t50.0%\n"
        );
    }

    #[test]
    fn test_render_empty_report() {
        assert_eq!(render_plain(&Report::default()), "\t\t\nTotal:\t0.0%\n");
    }

    #[test]
    fn test_render_colors() {
        let report = Report::new(vec![file("low.go", 1, 10), file("high.go", 9, 10)], Order::Ascending);
        let mut out = Ansi::new(Vec::new());
        report.render(&mut out).unwrap();
        let rendered = String::from_utf8(out.into_inner()).unwrap();
        let red = rendered.find("\x1b[31m").unwrap();
        let green = rendered.find("\x1b[32m").unwrap();
        let yellow = rendered.find("\x1b[33m").unwrap();
        assert!(red < rendered.find("low.go").unwrap());
        assert!(green < rendered.find("high.go").unwrap());
        assert!(yellow < rendered.find("Total:").unwrap());
        assert!(rendered.ends_with("\x1b[0m"));
    }
}
