//! Plain-text rendering of a [`Grid`] for the terminal client.

use std::fmt;

use crate::renderer::Grid;

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            if let Some(first) = row.first() {
                write!(f, "{} ", first.square.rank().char())?;
            }
            for cell in row {
                let shade = if cell.light { '·' } else { ' ' };
                write!(f, " {}", cell.glyph().unwrap_or(shade))?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        if let Some(last) = self.rows.last() {
            for cell in last {
                write!(f, " {}", cell.square.file().char())?;
            }
        }
        writeln!(f)
    }
}
