//! Line-oriented report writer for the demo output.

use std::fmt::{self, Display};
use std::io::{self, Write};

use crate::rest::public::FeeTier;

/// Line written before each section.
pub const SEPARATOR: &str = "----------------------------------------------------------";

/// Column the type label is padded to.
const LABEL_WIDTH: usize = 24;

/// Writes sections and labelled field lines to an underlying writer.
///
/// A field line reads `(<type>)<pad> : <path> : <value>`.
#[derive(Debug)]
pub struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Start a new section titled by the call it reports on.
    pub fn section(&mut self, title: impl Display) -> io::Result<()> {
        writeln!(self.out, "{SEPARATOR}")?;
        writeln!(self.out, "{title}")
    }

    /// Write one labelled field.
    pub fn field(&mut self, type_label: &str, path: &str, value: impl Display) -> io::Result<()> {
        let label = format!("({type_label})");
        writeln!(self.out, "{label:<LABEL_WIDTH$} : {path} : {value}")
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Displays a slice as `[a b c]`.
pub struct List<'a, T>(pub &'a [T]);

impl<T: Display> Display for List<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

/// Displays a fee schedule as `[[volume fee] ...]`.
pub struct Fees<'a>(pub &'a [FeeTier]);

impl Display for Fees<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (volume, fee)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "[{volume} {fee}]")?;
        }
        f.write_str("]")
    }
}

/// Displays an optional value, or `-` when absent.
pub struct Opt<T>(pub Option<T>);

impl<T: Display> Display for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("-"),
        }
    }
}
