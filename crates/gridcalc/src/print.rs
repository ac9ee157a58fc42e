//! Plain-text dumps of a sheet

use std::io::Write;

use gridcalc_core::{Position, Result};

use crate::cell::CellRef;
use crate::sheet::Sheet;

/// Options for printing a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Written between cells of a row (default: tab)
    pub column_separator: char,
    /// Written after every row (default: `"\n"`)
    pub row_terminator: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            column_separator: '\t',
            row_terminator: "\n".to_string(),
        }
    }
}

impl Sheet {
    /// Print the values of the printable area
    pub fn print_values<W: Write>(&self, output: &mut W) -> Result<()> {
        self.print_values_with(output, &PrintOptions::default())
    }

    /// Print the texts of the printable area
    pub fn print_texts<W: Write>(&self, output: &mut W) -> Result<()> {
        self.print_texts_with(output, &PrintOptions::default())
    }

    /// Print the values of the printable area with explicit options
    pub fn print_values_with<W: Write>(&self, output: &mut W, options: &PrintOptions) -> Result<()> {
        self.print_cells(output, options, |cell| cell.value().to_string())
    }

    /// Print the texts of the printable area with explicit options
    pub fn print_texts_with<W: Write>(&self, output: &mut W, options: &PrintOptions) -> Result<()> {
        self.print_cells(output, options, |cell| cell.text())
    }

    fn print_cells<W, F>(&self, output: &mut W, options: &PrintOptions, render: F) -> Result<()>
    where
        W: Write,
        F: Fn(&CellRef<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(output, "{}", options.column_separator)?;
                }
                let pos = Position::new(row as i32, col as i32);
                if let Some(cell) = self.get_cell(pos)? {
                    write!(output, "{}", render(&cell))?;
                }
            }
            write!(output, "{}", options.row_terminator)?;
        }
        Ok(())
    }
}
