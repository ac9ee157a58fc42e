//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Maximum number of column letters in A1 notation (`XFD`-style)
const MAX_COLUMN_LETTERS: usize = 3;

/// A cell position (row, column), both 0-based
///
/// Positions are plain values. A position may be invalid (negative or beyond
/// [`MAX_ROWS`]/[`MAX_COLS`]); [`Position::NONE`] is the canonical invalid one.
/// Every sheet entry point rejects invalid positions.
///
/// Ordering is row-major: rows compare first, then columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: i32,
}

impl Position {
    /// The sentinel invalid position
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check that the position lies inside the grid limits
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a position from A1-style notation
    ///
    /// Column letters must be upper case.
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!(pos, Position::new(0, 0));
    ///
    /// let pos = Position::parse("AB12").unwrap();
    /// assert_eq!(pos.row, 11);
    /// assert_eq!(pos.col, 27);
    ///
    /// assert!(Position::parse("a1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let letters = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();

        if letters == 0 {
            return Err(Error::InvalidPosition(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if letters > MAX_COLUMN_LETTERS {
            return Err(Error::InvalidPosition(format!(
                "too many column letters in '{}'",
                s
            )));
        }

        let digits = &s[letters..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPosition(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..letters])?;

        let mut row: i64 = 0;
        for b in digits.bytes() {
            row = row * 10 + i64::from(b - b'0');
            if row > i64::from(MAX_ROWS) {
                return Err(Error::InvalidPosition(format!(
                    "row number out of range in '{}'",
                    s
                )));
            }
        }

        // Rows are 1-based in A1 notation
        let pos = Position::new(row as i32 - 1, col);
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(format!("'{}' is outside the grid", s)));
        }
        Ok(pos)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = u64::from(col) + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<i32> {
        if letters.is_empty() {
            return Err(Error::InvalidPosition("empty column letters".into()));
        }

        let mut col: i64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidPosition(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c as i64 - 'A' as i64 + 1);
            if col > i64::from(MAX_COLS) {
                return Err(Error::InvalidPosition(format!(
                    "column '{}' out of range",
                    letters
                )));
            }
        }

        Ok((col - 1) as i32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Self::column_to_letters(self.col.unsigned_abs()), self.row + 1)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Extent of the printable area of a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Size {
    /// Create a new size
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Position::parse("A1").unwrap(), Position::new(0, 0));
        assert_eq!(Position::parse("B3").unwrap(), Position::new(2, 1));
        assert_eq!(Position::parse("Z1").unwrap(), Position::new(0, 25));
        assert_eq!(Position::parse("AA1").unwrap(), Position::new(0, 26));
    }

    #[test]
    fn test_parse_limits() {
        let last = Position::parse("XFD16384").unwrap();
        assert_eq!(last, Position::new(MAX_ROWS - 1, MAX_COLS - 1));

        assert!(Position::parse("XFE1").is_err());
        assert!(Position::parse("A16385").is_err());
        assert!(Position::parse("ABCD1").is_err());
        assert!(Position::parse("A99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_invalid() {
        for text in ["", "A", "1", "A0", "a1", "A1B", "$A$1", " A1", "A-1"] {
            assert!(
                matches!(Position::parse(text), Err(Error::InvalidPosition(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16_383), "XFD");
        assert_eq!(Position::column_to_letters(u32::MAX), "MWLQKWV");
    }

    #[test]
    fn test_validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(!Position::NONE.is_valid());
        assert!(!Position::new(MAX_ROWS, 0).is_valid());
        assert!(!Position::new(0, MAX_COLS).is_valid());
        assert!(!Position::new(-5, 3).is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(11, 27).to_string(), "AB12");
        assert_eq!(Position::NONE.to_string(), "");
    }

    #[test]
    fn test_row_major_order() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    proptest! {
        #[test]
        fn a1_notation_round_trips(row in 0..MAX_ROWS, col in 0..MAX_COLS) {
            let pos = Position::new(row, col);
            prop_assert_eq!(Position::parse(&pos.to_string()).unwrap(), pos);
        }
    }
}
