use std::io::{self, IsTerminal};

use crate::error::{RenderError, Result};

/// The character grid available for output, measured once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalExtent {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalExtent {
    pub fn new(columns: u16, rows: u16) -> Self {
        TerminalExtent { columns, rows }
    }

    /// Drop `rows` lines from the bottom, e.g. to keep the shell prompt visible.
    pub fn reserve(self, rows: u16) -> Self {
        TerminalExtent {
            columns: self.columns,
            rows: self.rows.saturating_sub(rows),
        }
    }

    /// Replace either axis with an explicit value.
    pub fn with_overrides(self, columns: Option<u16>, rows: Option<u16>) -> Self {
        TerminalExtent {
            columns: columns.unwrap_or(self.columns),
            rows: rows.unwrap_or(self.rows),
        }
    }
}

/// Ask the controlling terminal for its current size.
///
/// Fails with [`RenderError::Terminal`] when stdout is not a terminal.
pub fn query_extent() -> Result<TerminalExtent> {
    query_extent_with(io::stdout().is_terminal(), crossterm::terminal::size)
}

// crossterm falls back to terminfo defaults when no tty answers, so the
// tty check has to come first.
fn query_extent_with(
    stdout_is_terminal: bool,
    size: impl FnOnce() -> io::Result<(u16, u16)>,
) -> Result<TerminalExtent> {
    if !stdout_is_terminal {
        return Err(RenderError::Terminal(io::Error::other(
            "stdout is not a terminal (pass --cols and --rows to render anyway)",
        )));
    }
    let (columns, rows) = size().map_err(RenderError::Terminal)?;
    log::debug!("Terminal size: {}x{} cells", columns, rows);
    Ok(TerminalExtent { columns, rows })
}

/// Use the explicit extent when both axes are given, otherwise query the
/// terminal and apply whatever overrides exist.
pub fn resolve_extent(columns: Option<u16>, rows: Option<u16>) -> Result<TerminalExtent> {
    match (columns, rows) {
        (Some(columns), Some(rows)) => {
            log::debug!("Using explicit terminal size {}x{}", columns, rows);
            Ok(TerminalExtent { columns, rows })
        }
        _ => Ok(query_extent()?.with_overrides(columns, rows)),
    }
}
