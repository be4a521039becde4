//! Footprint assembly.
//!
//! Ties the namer, grids, replicator and router together for one set of
//! [`CardEdgeParams`] and emits the result onto a [`DrawingSurface`].
//!
//! Emission order is fixed so output is reproducible:
//!
//! 1. front fingers, then back fingers (variants with a back row)
//! 2. per connector, its through-hole pads followed by its routes
//! 3. courtyard
//! 4. value and reference text

use tracing::{debug, info};

use crate::footprint::pads::{PadFactory, StandardPadFactory};
use crate::footprint::primitives::{Layer, Text, TextKind};
use crate::footprint::{DrawingSurface, Footprint};
use crate::layout::connector::{ConnectorInstance, ConnectorReplicator};
use crate::layout::error::{LayoutError, LayoutResult};
use crate::layout::geometry::{Point, Rect};
use crate::layout::grid::GridSpec;
use crate::layout::naming::{BackRowNumbering, NamingMode, Namer};
use crate::layout::params::{CardEdgeParams, LayoutVariant};
use crate::layout::routing::{
    clearance_offset, BusPitch, BusRouter, RoutePad, RouteShape, RoutingPolicy, Side,
};

/// Courtyard line width (mm).
const COURTYARD_LINE_WIDTH: f64 = 0.05;

/// Courtyard margin beyond the finger length (mm).
const COURTYARD_MARGIN: f64 = 2.0;

/// Courtyard grid (mm).
const COURTYARD_GRID: f64 = 0.1;

/// Reference and value text height (mm).
const TEXT_SIZE: f64 = 1.0;

/// Counts of what a build emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Pads emitted.
    pub pads: usize,
    /// Trace segments emitted.
    pub tracks: usize,
    /// Connector instances placed.
    pub connectors: usize,
}

/// Builds card-edge footprints.
#[derive(Debug, Clone)]
pub struct FootprintAssembler<F = StandardPadFactory> {
    params: CardEdgeParams,
    variant: LayoutVariant,
    factory: F,
    namer: Namer,
    router: BusRouter,
    stagger: f64,
}

impl FootprintAssembler<StandardPadFactory> {
    /// Creates an assembler with pads sized from `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the resulting
    /// copper would overlap.
    pub fn new(params: CardEdgeParams) -> LayoutResult<Self> {
        let factory = StandardPadFactory {
            finger_width: params.pad_width,
            finger_length: params.pad_length,
            via_diameter: params.via_diameter,
            via_drill: params.via_drill,
        };
        Self::with_factory(params, factory)
    }
}

impl<F: PadFactory> FootprintAssembler<F> {
    /// Creates an assembler that takes its pads from `factory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the factory's
    /// through-hole pad has no drill, or the resulting copper would overlap.
    pub fn with_factory(params: CardEdgeParams, factory: F) -> LayoutResult<Self> {
        params.validate()?;
        let variant = params.resolve_variant()?;

        let geometry = factory.through_hole().geometry().ok_or_else(|| {
            LayoutError::invalid_parameter("through_hole", "pad template has no drill")
        })?;

        let stagger = if variant == LayoutVariant::Staggered {
            clearance_offset(params.pad_pitch, geometry.outer_width)
        } else {
            0.0
        };
        let row = if variant.has_back_row() {
            params.row_spacing
        } else {
            0.0
        };

        let edge_gap = params.connector_spacing - row / 2.0 - geometry.outer_width / 2.0;
        if edge_gap <= params.pad_length / 2.0 {
            return Err(LayoutError::clearance(
                "connector_spacing",
                params.connector_spacing,
                params.pad_length,
                "first connector row overlaps the finger pads",
            ));
        }

        let shape = match variant {
            LayoutVariant::Flat | LayoutVariant::Stitched => RouteShape::Straight,
            LayoutVariant::Staggered => RouteShape::Direct,
            LayoutVariant::ZigZag => RouteShape::Bent,
        };
        let policy = RoutingPolicy {
            shape,
            fat_columns: params.fat_traces.clone(),
            prefer_bottom: params.prefer_bottom,
        };
        let pitch = BusPitch {
            pad: params.pad_pitch,
            row,
            connector: params.connector_spacing,
            stagger,
        };
        let router = BusRouter::new(geometry, pitch, policy, params.signal_width)?;

        let namer = match params.naming {
            NamingMode::Alpha => Namer::alpha(params.skip_alpha.clone()),
            NamingMode::Numeric => Namer::numeric(),
        }
        .with_first_index(params.first_index)
        .with_back_row(if variant == LayoutVariant::Stitched {
            BackRowNumbering::Shared
        } else {
            params.back_row
        });

        debug!(?variant, stagger, row, "assembler configured");

        Ok(Self {
            params,
            variant,
            factory,
            namer,
            router,
            stagger,
        })
    }

    /// Returns the resolved layout variant.
    #[must_use]
    pub const fn variant(&self) -> LayoutVariant {
        self.variant
    }

    /// Returns the namer used for every row.
    #[must_use]
    pub const fn namer(&self) -> &Namer {
        &self.namer
    }

    /// Returns the bus router.
    #[must_use]
    pub const fn router(&self) -> &BusRouter {
        &self.router
    }

    /// Footprint value and name, e.g. `Card_Edge_Connector-43`.
    #[must_use]
    pub fn value(&self) -> String {
        format!("Card_Edge_Connector-{}", self.params.position_count)
    }

    /// The finger row along the card edge.
    #[must_use]
    pub fn finger_grid(&self) -> GridSpec {
        GridSpec::flat_row(self.params.position_count, self.params.pad_pitch)
            .with_namer(self.namer.clone())
    }

    /// Placed connector instances.
    #[must_use]
    pub fn connectors(&self) -> Vec<ConnectorInstance> {
        let unit = GridSpec::dual_row(
            self.params.position_count,
            self.params.pad_pitch,
            self.params.row_spacing,
        )
        .with_stagger(self.stagger)
        .with_namer(self.namer.clone());

        let count = if self.variant.has_back_row() {
            self.params.connector_count
        } else {
            0
        };
        ConnectorReplicator::new().build(&unit, count, self.params.connector_spacing)
    }

    /// Emits the whole footprint onto `surface`.
    pub fn assemble<S: DrawingSurface>(&self, surface: &mut S) -> BuildSummary {
        let mut summary = BuildSummary::default();
        let columns = self.params.position_count;
        let fingers = self.finger_grid();

        let front = self.factory.finger(Side::Front);
        for pad in fingers.pads() {
            surface.add_pad(&front, pad.position, &pad.label);
            summary.pads += 1;
        }

        if self.variant.has_back_row() {
            let back = self.factory.finger(Side::Back);
            for (_, column, position) in fingers.positions() {
                let label = self.namer.label(1, column, columns);
                surface.add_pad(&back, position, &label);
                summary.pads += 1;
            }
        }

        let through = self.factory.through_hole();
        for connector in self.connectors() {
            let pads = connector.grid.pads();
            debug!(
                index = connector.index,
                offset = connector.offset,
                edge_adjacent = connector.edge_adjacent,
                pads = pads.len(),
                "placing connector"
            );

            for pad in &pads {
                surface.add_pad(&through, pad.position, &pad.label);
                summary.pads += 1;
            }

            for pad in &pads {
                let route = RoutePad {
                    position: pad.position,
                    side: Side::from_row(pad.row),
                    column: pad.column + 1,
                };
                for segment in self.router.route(&route, connector.edge_adjacent) {
                    surface.add_track(segment);
                    summary.tracks += 1;
                }
            }
            summary.connectors += 1;
        }

        surface.add_box(self.courtyard(), Layer::FrontCourtyard, COURTYARD_LINE_WIDTH);

        let row = self.params.row_spacing;
        surface.add_text(Text {
            kind: TextKind::Value,
            text: self.value(),
            position: Point::new(0.0, -1.5 * row),
            size: TEXT_SIZE,
            layer: Layer::FrontFab,
        });
        surface.add_text(Text {
            kind: TextKind::Reference,
            text: "REF**".to_string(),
            position: Point::new(0.0, -2.5 * row),
            size: TEXT_SIZE,
            layer: Layer::FrontSilkscreen,
        });

        info!(
            pads = summary.pads,
            tracks = summary.tracks,
            connectors = summary.connectors,
            variant = ?self.variant,
            "footprint assembled"
        );
        summary
    }

    /// Builds the footprint into a new [`Footprint`].
    #[must_use]
    pub fn build(&self) -> Footprint {
        let mut footprint = Footprint::new(self.value());
        footprint.description = self.value();
        self.assemble(&mut footprint);
        footprint
    }

    /// Courtyard around the finger row, on a 0.1 mm grid.
    #[allow(clippy::cast_precision_loss)] // pad counts are small
    fn courtyard(&self) -> Rect {
        let p = &self.params;
        let width = (p.position_count as f64).mul_add(p.pad_pitch, p.pad_pitch - p.pad_width);
        let height = p.pad_length + COURTYARD_MARGIN;
        Rect::centred_at(
            Point::new(0.0, -1.0),
            round_up_to(width, COURTYARD_GRID),
            round_up_to(height, COURTYARD_GRID),
        )
    }
}

/// Rounds a value up to the nearest multiple of step.
fn round_up_to(value: f64, step: f64) -> f64 {
    // Tolerate representation error so exact multiples stay put
    ((value / step) - 1e-9).ceil() * step
}
