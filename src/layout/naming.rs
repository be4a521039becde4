//! Pad label generation.
//!
//! Card-edge connectors label one side with letters and the other with
//! numbers. Letters run `A..Z` then `a..z` with a configurable skip list
//! (typically `GIOQ`, which read too much like digits). When the alphabet
//! runs out the row continues with numbers.
//!
//! Labels are a pure function of `(row, column, column_count)`: there is no
//! rolling cursor, so a [`Namer`] can be shared by every row of every
//! connector and always returns the same label for the same pad.
//!
//! # Examples
//!
//! ```
//! use card_edge_footprint::layout::naming::{AlphaSkip, Namer};
//!
//! let namer = Namer::alpha(AlphaSkip::parse("GIOQ").unwrap());
//! assert_eq!(namer.label(0, 5, 43), "F");
//! assert_eq!(namer.label(0, 6, 43), "H");
//! assert_eq!(namer.label(1, 0, 43), "1");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::error::{LayoutError, LayoutResult};

/// Letters excluded from alpha labels, stored case-folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlphaSkip(BTreeSet<char>);

impl AlphaSkip {
    /// An empty skip set.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses a skip list such as `"GIOQ"` or `"g i o q"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list contains anything other than ASCII
    /// letters and whitespace.
    pub fn parse(letters: &str) -> LayoutResult<Self> {
        let mut set = BTreeSet::new();
        for c in letters.chars().filter(|c| !c.is_whitespace()) {
            if !c.is_ascii_alphabetic() {
                return Err(LayoutError::invalid_parameter(
                    "skip_alpha",
                    format!("'{c}' is not a letter"),
                ));
            }
            set.insert(c.to_ascii_lowercase());
        }
        Ok(Self(set))
    }

    /// Returns true if `letter` is skipped, ignoring case.
    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter.to_ascii_lowercase())
    }

    /// Number of distinct skipped letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AlphaSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c.to_ascii_uppercase())?;
        }
        Ok(())
    }
}

/// Front-row labelling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// Letters on the front row, numbers on the back row.
    #[default]
    Alpha,
    /// Numbers on both rows.
    Numeric,
}

/// How the back row is numbered.
///
/// Different layout shapes number the back row differently, so this is a
/// configuration choice rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackRowNumbering {
    /// Numbers continue left to right after the front row.
    #[default]
    Continue,
    /// Numbers continue right to left, so they wrap around the card.
    Mirror,
    /// The back row repeats the front-row labels (both rows are one net).
    Shared,
}

/// Maps pad grid indices to labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    mode: NamingMode,
    first_index: u32,
    back_row: BackRowNumbering,
    alphabet: Vec<char>,
}

impl Default for Namer {
    fn default() -> Self {
        Self::alpha(AlphaSkip::none())
    }
}

impl Namer {
    /// Creates an alpha namer starting at `A` and `1`.
    #[must_use]
    pub fn alpha(skip: AlphaSkip) -> Self {
        Self {
            mode: NamingMode::Alpha,
            first_index: 1,
            back_row: BackRowNumbering::Continue,
            alphabet: alphabet_without(&skip),
        }
    }

    /// Creates a numeric namer starting at `1`.
    #[must_use]
    pub fn numeric() -> Self {
        Self {
            mode: NamingMode::Numeric,
            first_index: 1,
            back_row: BackRowNumbering::Continue,
            alphabet: Vec::new(),
        }
    }

    /// Sets the first number used (default 1).
    #[must_use]
    pub const fn with_first_index(mut self, first_index: u32) -> Self {
        self.first_index = first_index;
        self
    }

    /// Sets the back-row numbering policy.
    #[must_use]
    pub const fn with_back_row(mut self, back_row: BackRowNumbering) -> Self {
        self.back_row = back_row;
        self
    }

    /// Returns the naming mode.
    #[must_use]
    pub const fn mode(&self) -> NamingMode {
        self.mode
    }

    /// Returns the back-row numbering policy.
    #[must_use]
    pub const fn back_row(&self) -> BackRowNumbering {
        self.back_row
    }

    /// Number of letters available before numeric fallback.
    #[must_use]
    pub fn alpha_len(&self) -> usize {
        match self.mode {
            NamingMode::Alpha => self.letters_available(),
            NamingMode::Numeric => 0,
        }
    }

    /// Returns the label of the pad at `(row, column)` in a row of
    /// `column_count` pads.
    ///
    /// Columns at or past `column_count` continue onto the next row.
    #[must_use]
    pub fn label(&self, row: usize, column: usize, column_count: usize) -> String {
        let count = column_count.max(1);
        let row = row + column / count;
        let column = column % count;

        if row == 0 {
            return self.front_label(column);
        }

        let front_numbers = match self.mode {
            NamingMode::Alpha => count.saturating_sub(self.letters_available()),
            NamingMode::Numeric => count,
        };
        let back_rows_before = (row - 1) * count;

        match self.back_row {
            BackRowNumbering::Shared => self.front_label(column),
            BackRowNumbering::Continue => {
                self.number(front_numbers + back_rows_before + column)
            }
            BackRowNumbering::Mirror => {
                self.number(front_numbers + back_rows_before + (count - 1 - column))
            }
        }
    }

    /// Returns the labels of a whole row.
    #[must_use]
    pub fn row_labels(&self, row: usize, column_count: usize) -> Vec<String> {
        (0..column_count)
            .map(|column| self.label(row, column, column_count))
            .collect()
    }

    fn front_label(&self, column: usize) -> String {
        match self.mode {
            NamingMode::Numeric => self.number(column),
            NamingMode::Alpha => {
                let letters = self.letters_available();
                if column < letters {
                    self.alphabet[column + self.letter_shift()].to_string()
                } else {
                    self.number(column - letters)
                }
            }
        }
    }

    /// Letters skipped at the start of the alphabet: `first_index` 1 starts
    /// at `A`, 2 at `B`. Zero counts as 1.
    fn letter_shift(&self) -> usize {
        usize::try_from(self.first_index.max(1) - 1).unwrap_or(usize::MAX)
    }

    /// Letters left for a row once the shift is applied.
    fn letters_available(&self) -> usize {
        self.alphabet.len().saturating_sub(self.letter_shift())
    }

    fn number(&self, offset: usize) -> String {
        (u64::from(self.first_index) + offset as u64).to_string()
    }
}

/// Uppercase then lowercase letters, minus the skipped ones.
fn alphabet_without(skip: &AlphaSkip) -> Vec<char> {
    ('A'..='Z')
        .chain('a'..='z')
        .filter(|c| !skip.contains(*c))
        .collect()
}
