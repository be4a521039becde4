//! Generated footprint model and output.
//!
//! The layout engine emits everything it computes through the
//! [`DrawingSurface`] trait. [`Footprint`] is the surface shipped with the
//! crate: it records the primitives in emission order and can write them
//! out as JSON or as a CSV pad table.
//!
//! # Output Formats
//!
//! ```text
//! json   full footprint: pads, tracks, courtyard, text
//! csv    one row per pad: designator, x, y, width, height, drill, layers
//! ```

pub mod pads;
pub mod primitives;

use std::io::Write;

use serde::{Deserialize, Serialize};

pub use pads::{PadFactory, StandardPadFactory};
pub use primitives::{Courtyard, Layer, LayerSet, Pad, PadShape, PadTemplate, Text, TextKind};

use crate::layout::error::{LayoutError, LayoutResult};
use crate::layout::geometry::{Point, Rect};
use crate::layout::routing::TraceSegment;

/// Receiver of generated primitives.
///
/// All coordinates are absolute; the surface never has to track a frame.
pub trait DrawingSurface {
    /// Places a pad built from `template`.
    fn add_pad(&mut self, template: &PadTemplate, position: Point, designator: &str);

    /// Draws a copper trace segment.
    fn add_track(&mut self, segment: TraceSegment);

    /// Draws a rectangle outline.
    fn add_box(&mut self, rect: Rect, layer: Layer, line_width: f64);

    /// Places a text item.
    fn add_text(&mut self, text: Text);
}

/// A complete generated footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Footprint name (e.g. "Card_Edge_Connector-43").
    pub name: String,

    /// Description of the footprint.
    #[serde(default)]
    pub description: String,

    /// Pads in emission order.
    #[serde(default)]
    pub pads: Vec<Pad>,

    /// Trace segments in emission order.
    #[serde(default)]
    pub tracks: Vec<TraceSegment>,

    /// Courtyard outlines.
    #[serde(default)]
    pub courtyard: Vec<Courtyard>,

    /// Text items.
    #[serde(default)]
    pub text: Vec<Text>,
}

impl Footprint {
    /// Creates a new empty footprint with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pads: Vec::new(),
            tracks: Vec::new(),
            courtyard: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Pads carrying the given designator.
    pub fn pads_named<'a>(&'a self, designator: &'a str) -> impl Iterator<Item = &'a Pad> + 'a {
        self.pads.iter().filter(move |p| p.designator == designator)
    }

    /// Tracks on the given layer.
    pub fn tracks_on(&self, layer: Layer) -> impl Iterator<Item = &TraceSegment> + '_ {
        self.tracks.iter().filter(move |t| t.layer == layer)
    }

    /// Serialises the footprint as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::output_error(format!("JSON serialisation failed: {e}")))
    }

    /// Writes one CSV row per pad.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_pad_table<W: Write>(&self, writer: W) -> LayoutResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for pad in &self.pads {
            csv.serialize(PadRow::from(pad))
                .map_err(|e| LayoutError::output_error(format!("CSV write failed: {e}")))?;
        }
        csv.flush()
            .map_err(|e| LayoutError::output_error(format!("CSV flush failed: {e}")))
    }
}

impl DrawingSurface for Footprint {
    fn add_pad(&mut self, template: &PadTemplate, position: Point, designator: &str) {
        self.pads.push(template.place(designator, position));
    }

    fn add_track(&mut self, segment: TraceSegment) {
        self.tracks.push(segment);
    }

    fn add_box(&mut self, rect: Rect, layer: Layer, line_width: f64) {
        self.courtyard.push(Courtyard {
            rect,
            layer,
            line_width,
        });
    }

    fn add_text(&mut self, text: Text) {
        self.text.push(text);
    }
}

/// Flat pad record for CSV output.
#[derive(Debug, Serialize)]
struct PadRow<'a> {
    designator: &'a str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    drill: Option<f64>,
    layers: String,
}

impl<'a> From<&'a Pad> for PadRow<'a> {
    fn from(pad: &'a Pad) -> Self {
        Self {
            designator: &pad.designator,
            x: pad.position.x,
            y: pad.position.y,
            width: pad.width,
            height: pad.height,
            drill: pad.drill,
            layers: pad.layers.names(),
        }
    }
}
