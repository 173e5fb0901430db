//! Reader of Go coverage profiles.
//!
//! A profile is the text file written by `go test -coverprofile`. The first line declares the counter mode, every
//! following line describes one basic block:
//!
//! ```text
//! mode: set
//! example.com/pkg/file.go:10.34,12.2 2 1
//! ```
//!
//! i.e. `<file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>`.

use error::*;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// The counter mode declared on the first line of a profile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Mode {
    /// Each counter records whether the block was run at all.
    Set,
    /// Each counter records how many times the block was run.
    Count,
    /// Like `Count`, but the counters were updated atomically.
    Atomic,
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> ::std::result::Result<Mode, String> {
        Ok(match s {
            "set" => Mode::Set,
            "count" => Mode::Count,
            "atomic" => Mode::Atomic,
            _ => return Err(format!("unknown mode `{}`", s)),
        })
    }
}

/// A contiguous range of statements sharing one counter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct CoverageBlock {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    /// Number of statements inside the block.
    pub num_stmt: u32,
    /// How many times the block was executed (0 or 1 in `set` mode).
    pub count: u64,
}

impl CoverageBlock {
    fn same_range(&self, other: &CoverageBlock) -> bool {
        (self.start_line, self.start_col, self.end_line, self.end_col) == (other.start_line, other.start_col, other.end_line, other.end_col)
    }
}

/// All blocks recorded for one source file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Profile {
    /// The file reference as written in the profile, usually `<import path>/<file name>`.
    pub file_name: String,
    pub mode: Mode,
    /// Blocks sorted by start position, with duplicated ranges merged.
    pub blocks: Vec<CoverageBlock>,
}

/// Reads the profile at `path`.
///
/// # Errors
///
/// * Returns [`Io`] if the file cannot be read.
/// * Returns [`ProfileParse`] if the content is malformed.
///
/// [`Io`]: ../error/enum.ErrorKind.html#variant.Io
/// [`ProfileParse`]: ../error/enum.ErrorKind.html#variant.ProfileParse
pub fn open<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Parses a profile, returning one [`Profile`] per file sorted by file name.
///
/// Blocks are sorted by start position. Repeated blocks, which appear when several test binaries covered the same
/// package, are merged: in `set` mode their counts are OR-ed, otherwise they are added.
///
/// [`Profile`]: ./struct.Profile.html
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Profile>> {
    let mut mode = None;
    let mut files = BTreeMap::<String, Vec<CoverageBlock>>::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let current = match mode {
            Some(current) => current,
            None => {
                mode = Some(parse_mode_line(&line).map_err(|reason| ErrorKind::ProfileParse(line_number, reason))?);
                continue;
            },
        };
        let (file_name, block) = parse_block_line(&line).map_err(|reason| ErrorKind::ProfileParse(line_number, reason))?;
        if current == Mode::Set && block.count > 1 {
            warn!("block with count {} in set mode at line {}", block.count, line_number);
        }
        files.entry(file_name.to_owned()).or_insert_with(Vec::new).push(block);
    }

    let mode = match mode {
        Some(mode) => mode,
        None => return Ok(Vec::new()),
    };

    files
        .into_iter()
        .map(|(file_name, blocks)| -> Result<Profile> {
            let blocks = merge_blocks(blocks, mode).chain_err(|| format!("while merging blocks of `{}`", file_name))?;
            trace!("profile {}: {} blocks", file_name, blocks.len());
            Ok(Profile { file_name, mode, blocks })
        })
        .collect()
}

fn parse_mode_line(line: &str) -> ::std::result::Result<Mode, String> {
    const PREFIX: &str = "mode: ";
    if !line.starts_with(PREFIX) || line.len() == PREFIX.len() {
        return Err(format!("bad mode line `{}`", line));
    }
    line[PREFIX.len()..].parse()
}

/// Splits `<file>:<sl>.<sc>,<el>.<ec> <numStmt> <count>`.
fn parse_block_line(line: &str) -> ::std::result::Result<(&str, CoverageBlock), String> {
    let bad = || format!("line `{}` does not match the expected format", line);

    let mut fields = line.rsplitn(3, ' ');
    let count = fields.next().ok_or_else(bad)?;
    let num_stmt = fields.next().ok_or_else(bad)?;
    let location = fields.next().ok_or_else(bad)?;

    let colon = location.rfind(':').ok_or_else(bad)?;
    let (file_name, range) = (&location[..colon], &location[(colon + 1)..]);
    if file_name.is_empty() {
        return Err(bad());
    }

    let comma = range.find(',').ok_or_else(bad)?;
    let (start_line, start_col) = parse_position(&range[..comma]).ok_or_else(bad)?;
    let (end_line, end_col) = parse_position(&range[(comma + 1)..]).ok_or_else(bad)?;

    Ok((
        file_name,
        CoverageBlock {
            start_line,
            start_col,
            end_line,
            end_col,
            num_stmt: num_stmt.parse().map_err(|_| bad())?,
            count: count.parse().map_err(|_| bad())?,
        },
    ))
}

fn parse_position(s: &str) -> Option<(u32, u32)> {
    let dot = s.find('.')?;
    Some((s[..dot].parse().ok()?, s[(dot + 1)..].parse().ok()?))
}

fn merge_blocks(mut blocks: Vec<CoverageBlock>, mode: Mode) -> Result<Vec<CoverageBlock>> {
    blocks.sort_by_key(|b| (b.start_line, b.start_col));

    let mut merged: Vec<CoverageBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if last.same_range(&block) {
                if last.num_stmt != block.num_stmt {
                    bail!(ErrorKind::InconsistentStatements(last.num_stmt, block.num_stmt));
                }
                match mode {
                    Mode::Set => last.count |= block.count,
                    Mode::Count | Mode::Atomic => last.count += block.count,
                }
                continue;
            }
        }
        merged.push(block);
    }
    Ok(merged)
}
