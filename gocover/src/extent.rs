//! Locations of the function declarations in a Go source file.
//!
//! Positions follow the coverage profile convention: lines and columns start from 1, and columns are counted in
//! bytes. The end position points just past the last token of the declaration.

use error::*;

use tree_sitter::{Node, Parser};

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The source range of a top-level `func` declaration.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct FunctionExtent {
    /// Name of the function.
    pub name: String,
    /// The line of the `func` keyword.
    pub start_line: u32,
    /// The column of the `func` keyword.
    pub start_col: u32,
    /// The line of the closing brace.
    pub end_line: u32,
    /// The column right after the closing brace.
    pub end_col: u32,
}

/// Parses Go sources and extracts the [`FunctionExtent`] of every top-level function.
///
/// Only plain function declarations are collected. Methods, function literals and anything nested inside another
/// declaration are ignored.
///
/// [`FunctionExtent`]: ./struct.FunctionExtent.html
pub struct Extractor {
    parser: Parser,
}

impl Extractor {
    pub fn new() -> Extractor {
        let mut parser = Parser::new();
        parser.set_language(&::tree_sitter_go::LANGUAGE.into()).expect("Go grammar matches the tree-sitter ABI");
        Extractor { parser }
    }

    /// Reads and parses the Go source at `path`.
    ///
    /// # Errors
    ///
    /// * Returns [`Io`] if the file cannot be read.
    /// * Returns [`SourceParse`] if the file contains a syntax error.
    ///
    /// [`Io`]: ../error/enum.ErrorKind.html#variant.Io
    /// [`SourceParse`]: ../error/enum.ErrorKind.html#variant.SourceParse
    pub fn extract<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<FunctionExtent>> {
        let path = path.as_ref();
        let mut source = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut source))
            .chain_err(|| format!("cannot read Go source `{}`", path.display()))?;
        self.parse(&source, &path.to_string_lossy())
    }

    /// Parses Go `source`. The `name` is only used in error messages.
    pub fn parse(&mut self, source: &[u8], name: &str) -> Result<Vec<FunctionExtent>> {
        let tree = match self.parser.parse(source, None) {
            Some(tree) => tree,
            None => bail!(ErrorKind::SourceParse(name.to_owned(), 0, 0)),
        };
        let root = tree.root_node();
        if root.has_error() {
            let position = first_error(root).unwrap_or(root).start_position();
            bail!(ErrorKind::SourceParse(name.to_owned(), position.row + 1, position.column + 1));
        }

        let mut cursor = root.walk();
        let functions = root.children(&mut cursor)
            .filter(|node| node.kind() == "function_declaration")
            .map(|node| function_extent(node, source))
            .collect::<Vec<_>>();
        debug!("{}: {} functions", name, functions.len());
        Ok(functions)
    }
}

impl Default for Extractor {
    fn default() -> Extractor {
        Extractor::new()
    }
}

fn function_extent(node: Node, source: &[u8]) -> FunctionExtent {
    let name = node.child_by_field_name("name")
        .map(|n| String::from_utf8_lossy(&source[n.byte_range()]).into_owned())
        .unwrap_or_default();
    let start = node.start_position();
    let end = node.end_position();
    FunctionExtent {
        name,
        start_line: start.row as u32 + 1,
        start_col: start.column as u32 + 1,
        end_line: end.row as u32 + 1,
        end_col: end.column as u32 + 1,
    }
}

/// Finds the first `ERROR` or `MISSING` node in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children = node.children(&mut cursor).collect::<Vec<_>>();
    children.into_iter().filter_map(first_error).next()
}
