//! Footprint primitive types.
//!
//! These types represent the elements a card-edge footprint is made of:
//! pads, trace segments, the courtyard box and text.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::layout::geometry::{Point, Rect};
use crate::layout::routing::PadGeometry;

/// Drawing layers used by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Front copper.
    #[serde(rename = "F.Cu")]
    FrontCopper,
    /// Back copper.
    #[serde(rename = "B.Cu")]
    BackCopper,
    /// Front silkscreen.
    #[serde(rename = "F.SilkS")]
    FrontSilkscreen,
    /// Front fabrication drawing.
    #[serde(rename = "F.Fab")]
    FrontFab,
    /// Front courtyard.
    #[serde(rename = "F.CrtYd")]
    FrontCourtyard,
}

impl Layer {
    /// Returns the conventional layer name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FrontCopper => "F.Cu",
            Self::BackCopper => "B.Cu",
            Self::FrontSilkscreen => "F.SilkS",
            Self::FrontFab => "F.Fab",
            Self::FrontCourtyard => "F.CrtYd",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Layers a pad is present on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerSet: u8 {
        /// Front copper.
        const F_CU = 0x01;
        /// Back copper.
        const B_CU = 0x02;
        /// Front solder paste.
        const F_PASTE = 0x04;
        /// Back solder paste.
        const B_PASTE = 0x08;
        /// Front solder mask opening.
        const F_MASK = 0x10;
        /// Back solder mask opening.
        const B_MASK = 0x20;

        /// Surface pad on the front side.
        const FRONT_SMD = Self::F_CU.bits() | Self::F_PASTE.bits() | Self::F_MASK.bits();
        /// Surface pad on the back side.
        const BACK_SMD = Self::B_CU.bits() | Self::B_PASTE.bits() | Self::B_MASK.bits();
        /// Plated through-hole pad.
        const THROUGH_HOLE = Self::F_CU.bits() | Self::B_CU.bits() | Self::F_MASK.bits() | Self::B_MASK.bits();
    }
}

impl LayerSet {
    /// Returns true if the set includes back copper.
    #[must_use]
    pub const fn has_back_copper(self) -> bool {
        self.contains(Self::B_CU)
    }

    /// Space-separated layer names, for tables.
    #[must_use]
    pub fn names(self) -> String {
        let names = [
            (Self::F_CU, "F.Cu"),
            (Self::B_CU, "B.Cu"),
            (Self::F_PASTE, "F.Paste"),
            (Self::B_PASTE, "B.Paste"),
            (Self::F_MASK, "F.Mask"),
            (Self::B_MASK, "B.Mask"),
        ];
        names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Pad shape types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadShape {
    /// Rectangular pad.
    #[default]
    Rectangle,
    /// Circular pad.
    Round,
}

/// A pad prototype handed out by a pad factory and stamped at each position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadTemplate {
    /// Pad shape.
    pub shape: PadShape,
    /// Size in X (mm).
    pub width: f64,
    /// Size in Y (mm).
    pub height: f64,
    /// Drill diameter for through-hole pads (mm).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill: Option<f64>,
    /// Layers the pad is on.
    pub layers: LayerSet,
}

impl PadTemplate {
    /// Creates a rectangular surface pad.
    #[must_use]
    pub const fn smd(width: f64, height: f64, layers: LayerSet) -> Self {
        Self {
            shape: PadShape::Rectangle,
            width,
            height,
            drill: None,
            layers,
        }
    }

    /// Creates a round plated through-hole pad.
    #[must_use]
    pub const fn through_hole(diameter: f64, drill: f64) -> Self {
        Self {
            shape: PadShape::Round,
            width: diameter,
            height: diameter,
            drill: Some(drill),
            layers: LayerSet::THROUGH_HOLE,
        }
    }

    /// Outer and drill diameter, for through-hole pads.
    #[must_use]
    pub fn geometry(&self) -> Option<PadGeometry> {
        self.drill.map(|drill| PadGeometry::new(self.width, drill))
    }

    /// Stamps the template at `position`.
    #[must_use]
    pub fn place(&self, designator: impl Into<String>, position: Point) -> Pad {
        Pad {
            designator: designator.into(),
            position,
            shape: self.shape,
            width: self.width,
            height: self.height,
            drill: self.drill,
            layers: self.layers,
        }
    }
}

/// A placed pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad designator (e.g. "A", "12").
    pub designator: String,
    /// Pad centre.
    pub position: Point,
    /// Pad shape.
    pub shape: PadShape,
    /// Size in X (mm).
    pub width: f64,
    /// Size in Y (mm).
    pub height: f64,
    /// Drill diameter (mm).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill: Option<f64>,
    /// Layers the pad is on.
    pub layers: LayerSet,
}

/// Courtyard outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Courtyard {
    /// Outline rectangle.
    pub rect: Rect,
    /// Layer the outline is drawn on.
    pub layer: Layer,
    /// Line width (mm).
    pub line_width: f64,
}

/// Text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// Reference designator placeholder.
    Reference,
    /// Component value.
    Value,
}

/// A text item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Text role.
    pub kind: TextKind,
    /// Text content.
    pub text: String,
    /// Anchor position.
    pub position: Point,
    /// Character height (mm).
    pub size: f64,
    /// Layer.
    pub layer: Layer,
}
