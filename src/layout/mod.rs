//! Card-edge footprint layout engine.
//!
//! The engine turns one [`CardEdgeParams`] into pads, traces, a courtyard
//! and text, emitted through [`DrawingSurface`](crate::footprint::DrawingSurface).
//!
//! # Coordinates
//!
//! Millimetres, origin at the centre of the finger row. `y` grows towards
//! the card edge, so connectors sit at negative `y`:
//!
//! ```text
//!   y = -2C   connector 1   row 0 (front) / row 1 (back)
//!   y = -C    connector 0   row 0 (front) / row 1 (back)
//!   y =  0    fingers
//!   ---------------------------------------- card edge
//! ```
//!
//! # Pieces
//!
//! - [`naming`]: pad labels (alpha with skip letters, or numeric)
//! - [`grid`]: pad positions for a flat or dual-row array
//! - [`connector`]: replication of the dual-row unit along the bus
//! - [`routing`]: traces tying each connector to the next
//! - [`assembler`]: drives the above in a fixed order
//!
//! # Example
//!
//! ```
//! use card_edge_footprint::layout::{CardEdgeParams, FootprintAssembler};
//!
//! let params = CardEdgeParams {
//!     connector_count: 2,
//!     ..CardEdgeParams::default()
//! };
//! let footprint = FootprintAssembler::new(params)?.build();
//! assert_eq!(footprint.name, "Card_Edge_Connector-43");
//! # Ok::<(), card_edge_footprint::layout::LayoutError>(())
//! ```

pub mod assembler;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod naming;
pub mod params;
pub mod routing;

pub use assembler::{BuildSummary, FootprintAssembler};
pub use connector::{ConnectorInstance, ConnectorReplicator};
pub use error::{LayoutError, LayoutResult};
pub use geometry::{Flip, Point, Rect, Transform};
pub use grid::{GridPad, GridSpec, RowDirection};
pub use naming::{AlphaSkip, BackRowNumbering, Namer, NamingMode};
pub use params::{CardEdgeParams, LayoutVariant};
pub use routing::{
    BusPitch, BusRouter, PadGeometry, RoutePad, RouteShape, RoutingPolicy, Side, TraceKind,
    TraceSegment,
};
