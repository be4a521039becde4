//! Pad grid placement.
//!
//! A [`GridSpec`] describes one rectangular pad array: a single flat row of
//! finger contacts, or the two through-hole rows of one connector, optionally
//! with the odd row staggered sideways.

use crate::layout::geometry::{Flip, Point, Transform};
use crate::layout::naming::Namer;

/// Which way row indices advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDirection {
    /// Row 0 is furthest from the card edge.
    #[default]
    Forward,
    /// The forward array mirrored about its centre line: row 0 is nearest
    /// the card edge.
    Flipped,
}

/// One rectangular pad array.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    /// Pads per row (`nx`).
    pub columns: usize,
    /// Number of rows (`ny`).
    pub rows: usize,
    /// Column pitch (mm).
    pub pitch_x: f64,
    /// Row pitch (mm).
    pub pitch_y: f64,
    /// Array centre.
    pub centre: Point,
    /// Extra x offset applied to odd rows (mm).
    pub stagger: f64,
    /// Row direction.
    pub direction: RowDirection,
    /// Label scheme for this array.
    pub namer: Namer,
}

/// A pad position produced by a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPad {
    /// Row index.
    pub row: usize,
    /// Column index (0-based).
    pub column: usize,
    /// Absolute position.
    pub position: Point,
    /// Pad label.
    pub label: String,
}

impl GridSpec {
    /// Creates a single flat row of `columns` pads centred on the origin.
    #[must_use]
    pub fn flat_row(columns: usize, pitch_x: f64) -> Self {
        Self {
            columns,
            rows: 1,
            pitch_x,
            pitch_y: 0.0,
            centre: Point::default(),
            stagger: 0.0,
            direction: RowDirection::Forward,
            namer: Namer::default(),
        }
    }

    /// Creates a two-row array centred on the origin with row 0 nearest the
    /// card edge.
    #[must_use]
    pub fn dual_row(columns: usize, pitch_x: f64, pitch_y: f64) -> Self {
        Self {
            rows: 2,
            pitch_y,
            direction: RowDirection::Flipped,
            ..Self::flat_row(columns, pitch_x)
        }
    }

    /// Sets the namer.
    #[must_use]
    pub fn with_namer(mut self, namer: Namer) -> Self {
        self.namer = namer;
        self
    }

    /// Sets the odd-row stagger.
    #[must_use]
    pub const fn with_stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger;
        self
    }

    /// Returns a copy moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            centre: self.centre.offset(dx, dy),
            ..self.clone()
        }
    }

    /// Total number of pads.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Returns true if the grid has no pads.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the pad at `(row, column)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // grid indices are small
    pub fn position(&self, row: usize, column: usize) -> Point {
        let first_x = -self.pitch_x * (self.columns as f64 - 1.0) / 2.0;
        let first_y = -self.pitch_y * (self.rows as f64 - 1.0) / 2.0;

        let mut x = self.pitch_x.mul_add(column as f64, first_x);
        if row % 2 == 1 {
            x += self.stagger;
        }
        let local = Point::new(x, self.pitch_y.mul_add(row as f64, first_y));

        self.placement().apply(local)
    }

    /// Maps grid-local points (grid centred on the origin, row 0 first) to
    /// board coordinates.
    #[must_use]
    pub fn placement(&self) -> Transform {
        let orient = match self.direction {
            RowDirection::Forward => Transform::identity(),
            RowDirection::Flipped => Transform::flip(Point::default(), Flip::Vertical),
        };
        orient.then(Transform::translate(self.centre.x, self.centre.y))
    }

    /// All positions in row-major order.
    #[must_use]
    pub fn positions(&self) -> Vec<(usize, usize, Point)> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| (row, column)))
            .map(|(row, column)| (row, column, self.position(row, column)))
            .collect()
    }

    /// All pads in row-major order with their labels.
    #[must_use]
    pub fn pads(&self) -> Vec<GridPad> {
        self.positions()
            .into_iter()
            .map(|(row, column, position)| GridPad {
                row,
                column,
                position,
                label: self.namer.label(row, column, self.columns),
            })
            .collect()
    }
}
