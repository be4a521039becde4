//! Card-edge footprint parameters and layout variants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::error::{LayoutError, LayoutResult};
use crate::layout::naming::{AlphaSkip, BackRowNumbering, NamingMode};

/// Layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Fingers plus one through-hole row, no backplane.
    Flat,
    /// Two rows per connector tied into one net, routed straight.
    Stitched,
    /// Two rows per connector, back row staggered, routed with diagonals.
    Staggered,
    /// Two rows per connector, routed with bent bridges.
    ZigZag,
}

impl LayoutVariant {
    /// Returns true if the variant has a back row.
    #[must_use]
    pub const fn has_back_row(self) -> bool {
        !matches!(self, Self::Flat)
    }
}

/// Everything needed to build one card-edge footprint.
///
/// Lengths are millimetres. [`Default`] gives the EXORbus backplane.
#[derive(Debug, Clone, PartialEq)]
pub struct CardEdgeParams {
    /// Number of replicated connectors; 0 builds a single through-hole row.
    pub connector_count: usize,
    /// Pitch between replicated connectors.
    pub connector_spacing: f64,
    /// Route plain signals on back copper.
    pub prefer_bottom: bool,
    /// Pads per row.
    pub position_count: usize,
    /// `position_count` must be a multiple of this.
    pub position_multiple: usize,
    /// Front-row labelling mode.
    pub naming: NamingMode,
    /// Letters left out of alpha labels.
    pub skip_alpha: AlphaSkip,
    /// First number used in labels.
    pub first_index: u32,
    /// Back-row numbering policy.
    pub back_row: BackRowNumbering,
    /// Distance between the two through-hole rows.
    pub row_spacing: f64,
    /// Finger length into the card.
    pub pad_length: f64,
    /// Finger width along the edge.
    pub pad_width: f64,
    /// Pitch between neighbouring pads.
    pub pad_pitch: f64,
    /// 1-based columns routed as fat power traces.
    pub fat_traces: BTreeSet<usize>,
    /// Stagger the back through-hole row.
    pub stagger: bool,
    /// Through-hole pad diameter.
    pub via_diameter: f64,
    /// Through-hole drill diameter.
    pub via_drill: f64,
    /// Signal trace width.
    pub signal_width: f64,
    /// Explicit variant; derived from the other options when `None`.
    pub variant: Option<LayoutVariant>,
}

impl Default for CardEdgeParams {
    fn default() -> Self {
        Self {
            connector_count: 8,
            connector_spacing: 19.05,
            prefer_bottom: false,
            position_count: 43,
            position_multiple: 1,
            naming: NamingMode::Alpha,
            // AlphaSkip::parse only fails on non-letters
            skip_alpha: AlphaSkip::parse("GIOQ").unwrap_or_default(),
            first_index: 1,
            back_row: BackRowNumbering::Continue,
            row_spacing: 5.08,
            pad_length: 8.0,
            pad_width: 2.54,
            pad_pitch: 3.96,
            fat_traces: [1, 2, 3, 11, 16, 20, 21, 22, 41, 42, 43, 9, 17, 24]
                .into_iter()
                .collect(),
            stagger: false,
            via_diameter: 1.8,
            via_drill: 0.9,
            signal_width: 0.5,
            variant: None,
        }
    }
}

impl CardEdgeParams {
    /// Parses a space-separated list of 1-based column numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is not a positive integer.
    pub fn parse_fat_traces(list: &str) -> LayoutResult<BTreeSet<usize>> {
        list.split_whitespace()
            .map(|token| match token.parse::<usize>() {
                Ok(column) if column > 0 => Ok(column),
                _ => Err(LayoutError::invalid_parameter(
                    "fat_traces",
                    format!("'{token}' is not a column number"),
                )),
            })
            .collect()
    }

    /// Picks the layout variant, checking an explicit choice against the
    /// connector count and stagger option.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit variant contradicts the other
    /// options.
    pub fn resolve_variant(&self) -> LayoutResult<LayoutVariant> {
        let Some(variant) = self.variant else {
            return Ok(if self.connector_count == 0 {
                if self.stagger {
                    warn!("stagger_vias has no effect without connectors");
                }
                LayoutVariant::Flat
            } else if self.stagger {
                LayoutVariant::Staggered
            } else {
                LayoutVariant::ZigZag
            });
        };

        if (variant == LayoutVariant::Flat) != (self.connector_count == 0) {
            return Err(LayoutError::invalid_parameter(
                "variant",
                format!(
                    "{variant:?} does not fit a connector count of {}",
                    self.connector_count
                ),
            ));
        }
        if self.stagger && matches!(variant, LayoutVariant::Stitched | LayoutVariant::ZigZag) {
            return Err(LayoutError::invalid_parameter(
                "variant",
                format!("{variant:?} cannot stagger vias; use the staggered variant"),
            ));
        }
        Ok(variant)
    }

    /// Checks every parameter on its own and the finger geometry.
    ///
    /// Through-hole clearances are checked by the bus router.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending parameter.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.position_count == 0 {
            return Err(LayoutError::invalid_parameter(
                "position_count",
                "must be at least 1",
            ));
        }
        if self.position_multiple == 0 {
            return Err(LayoutError::invalid_parameter(
                "position_multiple",
                "must be at least 1",
            ));
        }
        if self.position_count % self.position_multiple != 0 {
            return Err(LayoutError::invalid_parameter(
                "position_count",
                format!(
                    "{} is not a multiple of {}",
                    self.position_count, self.position_multiple
                ),
            ));
        }

        positive("connector_spacing", self.connector_spacing)?;
        positive("pad_length", self.pad_length)?;
        positive("pad_width", self.pad_width)?;
        positive("pad_pitch", self.pad_pitch)?;
        if self.connector_count > 0 {
            positive("row_spacing", self.row_spacing)?;
        }

        if let Some(&column) = self
            .fat_traces
            .iter()
            .find(|&&c| c == 0 || c > self.position_count)
        {
            return Err(LayoutError::invalid_parameter(
                "fat_traces",
                format!(
                    "column {column} is outside 1..={}",
                    self.position_count
                ),
            ));
        }

        if self.position_count > 1 && self.pad_pitch <= self.pad_width {
            return Err(LayoutError::clearance(
                "pad_pitch",
                self.pad_pitch,
                self.pad_width,
                "finger pads overlap",
            ));
        }
        if self.connector_count > 0 && self.row_spacing >= self.pad_length {
            return Err(LayoutError::clearance(
                "row_spacing",
                self.row_spacing,
                self.pad_length,
                "edge traces would end beyond the finger pads",
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid_parameter(
            name,
            format!("must be a positive length, got {value}"),
        ))
    }
}
