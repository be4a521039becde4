//! Pad factories.
//!
//! The layout engine never builds pads itself: it asks a [`PadFactory`] for
//! a template and stamps it at each computed position. Layer masks and pad
//! attributes are the factory's business.

use crate::footprint::primitives::{LayerSet, PadTemplate};
use crate::layout::routing::Side;

/// Source of pad templates.
pub trait PadFactory {
    /// Finger contact on the given side of the card.
    fn finger(&self, side: Side) -> PadTemplate;

    /// Plated through-hole pad for the connector rows.
    fn through_hole(&self) -> PadTemplate;
}

/// Rectangular fingers and round plated through-holes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardPadFactory {
    /// Finger width across the card edge (mm).
    pub finger_width: f64,
    /// Finger length into the card (mm).
    pub finger_length: f64,
    /// Through-hole pad diameter (mm).
    pub via_diameter: f64,
    /// Through-hole drill diameter (mm).
    pub via_drill: f64,
}

impl Default for StandardPadFactory {
    /// EXORbus fingers with 70.87 mil / 35.43 mil through-holes.
    fn default() -> Self {
        Self {
            finger_width: 2.54,
            finger_length: 8.0,
            via_diameter: 1.8,
            via_drill: 0.9,
        }
    }
}

impl PadFactory for StandardPadFactory {
    fn finger(&self, side: Side) -> PadTemplate {
        let layers = match side {
            Side::Front => LayerSet::FRONT_SMD,
            Side::Back => LayerSet::BACK_SMD,
        };
        PadTemplate::smd(self.finger_width, self.finger_length, layers)
    }

    fn through_hole(&self) -> PadTemplate {
        PadTemplate::through_hole(self.via_diameter, self.via_drill)
    }
}
