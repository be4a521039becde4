//! Bus trace synthesis between replicated connectors.
//!
//! Every through-hole pad of a connector is tied to the same pad one
//! connector pitch closer to the card edge, or to the finger itself for the
//! connector nearest the edge. The shape of each connection is picked in
//! this order:
//!
//! 1. **Fat** - power columns get one straight, wide trace on the pad's own
//!    side, so the net is carried on both copper layers.
//! 2. **Edge stub** - front-row pads of the edge connector drop straight
//!    onto the inboard end of the finger.
//! 3. **Bent bridge** - a diagonal out to a clearance point beside the pad
//!    it has to pass, a short vertical neck, and a diagonal back in line.
//!    Front-row routes are the same path turned a half turn about the route
//!    midpoint, so the two rows bend away from each other.
//! 4. **Direct** / **straight** - staggered and stitched layouts need no
//!    neck: the trace is one segment.
//!
//! ```text
//!   back row   o            o   <- next connector
//!               \          /
//!                |  o  o  |      neck beside the other row's pad
//!               /          \
//!   front row  o            o
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::footprint::primitives::Layer;
use crate::layout::error::{LayoutError, LayoutResult};
use crate::layout::geometry::{Flip, Point, Transform};

/// Default signal trace width (mm).
pub const DEFAULT_SIGNAL_WIDTH: f64 = 0.5;

/// Outer and drill diameter of the through-hole pads being routed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadGeometry {
    /// Copper outer diameter (mm).
    pub outer_width: f64,
    /// Drill diameter (mm).
    pub drill_diameter: f64,
}

impl PadGeometry {
    /// Creates a pad geometry.
    #[must_use]
    pub const fn new(outer_width: f64, drill_diameter: f64) -> Self {
        Self {
            outer_width,
            drill_diameter,
        }
    }

    /// Width of a fat trace: half way between the drill and the pad edge.
    #[must_use]
    pub fn fat_width(&self) -> f64 {
        self.drill_diameter + (self.outer_width - self.drill_diameter) / 2.0
    }
}

/// Which row of a connector a pad sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Row 0, nearest the card edge, tied to the front fingers.
    Front,
    /// Row 1, tied to the back fingers.
    Back,
}

impl Side {
    /// Maps a grid row index to a side.
    #[must_use]
    pub const fn from_row(row: usize) -> Self {
        if row == 0 {
            Self::Front
        } else {
            Self::Back
        }
    }

    /// Copper layer that belongs to this side.
    #[must_use]
    pub const fn copper(self) -> Layer {
        match self {
            Self::Front => Layer::FrontCopper,
            Self::Back => Layer::BackCopper,
        }
    }
}

/// Shape used for plain signal routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteShape {
    /// One straight segment.
    Straight,
    /// Diagonal, neck, diagonal.
    #[default]
    Bent,
    /// One diagonal segment, relying on the stagger for clearance.
    Direct,
}

/// What kind of net a trace carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// Ordinary signal trace.
    Signal,
    /// Widened power trace.
    Power,
}

/// A straight copper trace segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSegment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Trace width (mm).
    pub width: f64,
    /// Copper layer.
    pub layer: Layer,
    /// Net kind.
    pub kind: TraceKind,
}

impl TraceSegment {
    /// Creates a segment.
    #[must_use]
    pub const fn new(start: Point, end: Point, width: f64, layer: Layer, kind: TraceKind) -> Self {
        Self {
            start,
            end,
            width,
            layer,
            kind,
        }
    }

    /// Absolute x distance between the endpoints.
    #[must_use]
    pub fn horizontal_offset(&self) -> f64 {
        (self.end.x - self.start.x).abs()
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// Routing choices selected by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingPolicy {
    /// Shape for plain signal routes.
    pub shape: RouteShape,
    /// 1-based columns routed as fat power traces.
    pub fat_columns: BTreeSet<usize>,
    /// Put plain signal routes on back copper.
    pub prefer_bottom: bool,
}

impl RoutingPolicy {
    /// Returns true if `column` (1-based) is a power net.
    #[must_use]
    pub fn is_fat(&self, column: usize) -> bool {
        self.fat_columns.contains(&column)
    }
}

/// Pitches the router works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusPitch {
    /// Column pitch (mm).
    pub pad: f64,
    /// Distance between the two through-hole rows (mm); 0 for a single row.
    pub row: f64,
    /// Distance between replicated connectors (mm).
    pub connector: f64,
    /// X shift of the back row (mm).
    pub stagger: f64,
}

/// A through-hole pad to be routed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePad {
    /// Absolute pad position.
    pub position: Point,
    /// Row the pad is on.
    pub side: Side,
    /// 1-based column number.
    pub column: usize,
}

/// Synthesises the traces that tie connectors into a bus.
#[derive(Debug, Clone)]
pub struct BusRouter {
    geometry: PadGeometry,
    pitch: BusPitch,
    policy: RoutingPolicy,
    signal_width: f64,
}

impl BusRouter {
    /// Creates a router, checking that the requested shapes fit between the
    /// pads.
    ///
    /// # Errors
    ///
    /// Returns an error if the pad geometry is malformed or a pitch is too
    /// small for the pads and traces it has to clear.
    pub fn new(
        geometry: PadGeometry,
        pitch: BusPitch,
        policy: RoutingPolicy,
        signal_width: f64,
    ) -> LayoutResult<Self> {
        let router = Self {
            geometry,
            pitch,
            policy,
            signal_width,
        };
        router.check()?;
        Ok(router)
    }

    /// Horizontal offset of the bent-bridge neck.
    ///
    /// Half the pad pitch, capped at twice the via width so wide pitches do
    /// not drag the diagonal across the neighbouring pads.
    #[must_use]
    pub fn clearance_offset(&self) -> f64 {
        clearance_offset(self.pitch.pad, self.geometry.outer_width)
    }

    /// Returns the routing policy.
    #[must_use]
    pub const fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Where the route from `pad` ends.
    #[must_use]
    pub fn destination(&self, pad: &RoutePad, edge_adjacent: bool) -> Point {
        let p = pad.position;
        if !edge_adjacent {
            return p.offset(0.0, self.pitch.connector);
        }
        match pad.side {
            Side::Front => p.offset(0.0, self.pitch.connector - self.pitch.row),
            Side::Back => p.offset(-self.pitch.stagger, self.pitch.connector),
        }
    }

    /// Builds the trace segments for one pad, ordered from the pad outward.
    #[must_use]
    pub fn route(&self, pad: &RoutePad, edge_adjacent: bool) -> Vec<TraceSegment> {
        let from = pad.position;
        let to = self.destination(pad, edge_adjacent);

        if self.policy.is_fat(pad.column) {
            return vec![TraceSegment::new(
                from,
                to,
                self.geometry.fat_width(),
                pad.side.copper(),
                TraceKind::Power,
            )];
        }

        if edge_adjacent && pad.side == Side::Front {
            return vec![self.signal(from, to, Layer::FrontCopper)];
        }

        let layer = if self.policy.prefer_bottom {
            Layer::BackCopper
        } else {
            pad.side.copper()
        };

        match self.policy.shape {
            RouteShape::Straight | RouteShape::Direct => vec![self.signal(from, to, layer)],
            RouteShape::Bent => self.bent_bridge(pad, to, layer),
        }
    }

    fn bent_bridge(&self, pad: &RoutePad, to: Point, layer: Layer) -> Vec<TraceSegment> {
        let from = pad.position;
        let xp = self.clearance_offset();
        let neck = self.geometry.outer_width / 2.0;

        let near = Point::new(from.x - xp, from.y + self.pitch.row - neck);
        let far = Point::new(from.x - xp, from.y + self.pitch.row + neck);

        // The half turn swaps the route ends, so the neck is walked backwards.
        let (near, far) = if pad.side == Side::Front {
            let pivot = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
            let half_turn = Transform::flip(pivot, Flip::Both);
            (half_turn.apply(far), half_turn.apply(near))
        } else {
            (near, far)
        };

        [from, near, far, to]
            .windows(2)
            .map(|w| self.signal(w[0], w[1], layer))
            .collect()
    }

    const fn signal(&self, from: Point, to: Point, layer: Layer) -> TraceSegment {
        TraceSegment::new(from, to, self.signal_width, layer, TraceKind::Signal)
    }

    fn check(&self) -> LayoutResult<()> {
        let vw = self.geometry.outer_width;
        let drill = self.geometry.drill_diameter;

        if !(vw.is_finite() && vw > 0.0) {
            return Err(LayoutError::invalid_parameter(
                "through_hole.diameter",
                format!("must be positive, got {vw}"),
            ));
        }
        if !(drill.is_finite() && drill > 0.0 && drill < vw) {
            return Err(LayoutError::invalid_parameter(
                "through_hole.drill",
                format!("must be positive and smaller than the pad diameter {vw}, got {drill}"),
            ));
        }
        if !(self.signal_width.is_finite() && self.signal_width > 0.0) {
            return Err(LayoutError::invalid_parameter(
                "traces.signal_width",
                format!("must be positive, got {}", self.signal_width),
            ));
        }
        if self.pitch.pad <= vw {
            return Err(LayoutError::clearance(
                "pad_pitch",
                self.pitch.pad,
                vw,
                "adjacent through-hole pads overlap",
            ));
        }
        if self.pitch.row > 0.0 && self.pitch.row <= vw {
            return Err(LayoutError::clearance(
                "row_spacing",
                self.pitch.row,
                vw,
                "through-hole rows overlap",
            ));
        }
        if self.pitch.connector - self.pitch.row <= vw {
            return Err(LayoutError::clearance(
                "connector_spacing",
                self.pitch.connector,
                vw,
                "rows of neighbouring connectors overlap",
            ));
        }
        if self.policy.shape == RouteShape::Bent {
            let xp = self.clearance_offset();
            if xp - self.signal_width / 2.0 <= vw / 2.0 {
                return Err(LayoutError::clearance(
                    "pad_pitch",
                    self.pitch.pad,
                    vw,
                    format!(
                        "bridge neck offset {xp} mm leaves no room for a {} mm trace beside the pad",
                        self.signal_width
                    ),
                ));
            }
        }
        if self.policy.shape == RouteShape::Direct && self.pitch.row > 0.0 {
            self.check_edge_diagonal()?;
        }
        Ok(())
    }

    /// The edge-adjacent back-row trace runs diagonally past the front row
    /// of its own connector. Both the stagger run and the diagonal must stay
    /// clear of the front pads.
    fn check_edge_diagonal(&self) -> LayoutResult<()> {
        let vw = self.geometry.outer_width;
        let stagger = self.pitch.stagger;

        if stagger - self.signal_width / 2.0 <= vw / 2.0 {
            return Err(LayoutError::clearance(
                "pad_pitch",
                self.pitch.pad,
                vw,
                format!(
                    "stagger {stagger} mm leaves no room for a {} mm trace beside the front pad",
                    self.signal_width
                ),
            ));
        }

        // Relative to the back pad: the diagonal ends one connector pitch up
        // and one stagger left, passing the front row at `row`.
        let start = Point::new(0.0, 0.0);
        let end = Point::new(-stagger, self.pitch.connector);
        let min_gap = (vw + self.signal_width) / 2.0;
        for front in [
            Point::new(-stagger, self.pitch.row),
            Point::new(self.pitch.pad - stagger, self.pitch.row),
        ] {
            let gap = distance_to_segment(front, start, end);
            if gap <= min_gap {
                return Err(LayoutError::clearance(
                    "pad_pitch",
                    self.pitch.pad,
                    vw,
                    format!(
                        "edge diagonal passes {gap:.3} mm from a front pad centre, needs more than {min_gap} mm"
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx.mul_add(dx, dy * dy);
    let t = if len_sq > 0.0 {
        ((p.x - a.x).mul_add(dx, (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y));
    (p.x - closest.x).hypot(p.y - closest.y)
}

/// Horizontal clearance offset for a given pad pitch and via width.
#[must_use]
pub fn clearance_offset(pad_pitch: f64, via_width: f64) -> f64 {
    (pad_pitch / 2.0).min(via_width * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geometry() -> PadGeometry {
        PadGeometry::new(1.8, 0.9)
    }

    fn pitch() -> BusPitch {
        BusPitch {
            pad: 3.96,
            row: 5.08,
            connector: 19.05,
            stagger: 0.0,
        }
    }

    fn router(policy: RoutingPolicy) -> BusRouter {
        BusRouter::new(geometry(), pitch(), policy, DEFAULT_SIGNAL_WIDTH).unwrap()
    }

    fn pad(side: Side, column: usize) -> RoutePad {
        let y = match side {
            Side::Front => -19.05 * 2.0 + 2.54,
            Side::Back => -19.05 * 2.0 - 2.54,
        };
        RoutePad {
            position: Point::new(1.0, y),
            side,
            column,
        }
    }

    #[test]
    fn fat_width_is_mid_envelope() {
        assert!((geometry().fat_width() - 1.35).abs() < EPS);
    }

    #[test]
    fn clearance_offset_caps_at_twice_via() {
        assert!((clearance_offset(3.96, 1.8) - 1.98).abs() < EPS);
        assert!((clearance_offset(10.0, 1.8) - 3.6).abs() < EPS);
    }

    #[test]
    fn fat_route_is_one_wide_vertical() {
        let r = router(RoutingPolicy {
            fat_columns: [1].into_iter().collect(),
            ..RoutingPolicy::default()
        });
        for side in [Side::Front, Side::Back] {
            let segs = r.route(&pad(side, 1), false);
            assert_eq!(segs.len(), 1);
            assert_eq!(segs[0].kind, TraceKind::Power);
            assert_eq!(segs[0].layer, side.copper());
            assert!((segs[0].width - 1.35).abs() < EPS);
            assert!(segs[0].horizontal_offset() < EPS);
            assert!((segs[0].length() - 19.05).abs() < EPS);
        }
    }

    #[test]
    fn fat_front_route_is_shortened_at_edge() {
        let r = router(RoutingPolicy {
            fat_columns: [1].into_iter().collect(),
            ..RoutingPolicy::default()
        });
        let segs = r.route(&pad(Side::Front, 1), true);
        assert!((segs[0].length() - (19.05 - 5.08)).abs() < EPS);
        let segs = r.route(&pad(Side::Back, 1), true);
        assert!((segs[0].length() - 19.05).abs() < EPS);
    }

    #[test]
    fn edge_stub_stays_on_front_copper() {
        let r = router(RoutingPolicy {
            prefer_bottom: true,
            ..RoutingPolicy::default()
        });
        let segs = r.route(&pad(Side::Front, 4), true);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].layer, Layer::FrontCopper);
        assert!((segs[0].length() - (19.05 - 5.08)).abs() < EPS);
    }

    #[test]
    fn back_bridge_bends_left_through_neck() {
        let r = router(RoutingPolicy::default());
        let p = pad(Side::Back, 4);
        let segs = r.route(&p, false);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].start, p.position);
        assert!((segs[0].end.x - (1.0 - 1.98)).abs() < EPS);
        assert!((segs[1].length() - 1.8).abs() < EPS);
        assert!(segs[1].horizontal_offset() < EPS);
        assert!((segs[2].end.x - 1.0).abs() < EPS);
        assert!((segs[2].end.y - (p.position.y + 19.05)).abs() < EPS);
        assert!(segs.iter().all(|s| s.layer == Layer::BackCopper));
    }

    #[test]
    fn front_bridge_is_half_turn_of_back_bridge() {
        let r = router(RoutingPolicy::default());
        let p = pad(Side::Front, 4);
        let segs = r.route(&p, false);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].start, p.position);
        // neck sits on the right, one row pitch short of the destination
        assert!((segs[1].start.x - (1.0 + 1.98)).abs() < EPS);
        assert!((segs[1].start.y - (p.position.y + 19.05 - 5.08 - 0.9)).abs() < 1e-6);
        assert!((segs[2].end.y - (p.position.y + 19.05)).abs() < 1e-6);
        assert!(segs.iter().all(|s| s.layer == Layer::FrontCopper));
    }

    #[test]
    fn segments_are_contiguous() {
        let r = router(RoutingPolicy::default());
        for side in [Side::Front, Side::Back] {
            let segs = r.route(&pad(side, 7), false);
            for w in segs.windows(2) {
                assert!((w[0].end.x - w[1].start.x).abs() < EPS);
                assert!((w[0].end.y - w[1].start.y).abs() < EPS);
            }
        }
    }

    #[test]
    fn prefer_bottom_moves_signals_not_power() {
        let r = router(RoutingPolicy {
            prefer_bottom: true,
            fat_columns: [2].into_iter().collect(),
            ..RoutingPolicy::default()
        });
        assert!(r
            .route(&pad(Side::Front, 1), false)
            .iter()
            .all(|s| s.layer == Layer::BackCopper));
        assert_eq!(r.route(&pad(Side::Front, 2), false)[0].layer, Layer::FrontCopper);
    }

    #[test]
    fn direct_route_is_single_diagonal_to_finger() {
        let staggered = BusPitch {
            stagger: 1.98,
            ..pitch()
        };
        let r = BusRouter::new(
            geometry(),
            staggered,
            RoutingPolicy {
                shape: RouteShape::Direct,
                ..RoutingPolicy::default()
            },
            DEFAULT_SIGNAL_WIDTH,
        )
        .unwrap();
        assert_eq!(r.policy().shape, RouteShape::Direct);
        let segs = r.route(&pad(Side::Back, 3), true);
        assert_eq!(segs.len(), 1);
        assert!((segs[0].horizontal_offset() - 1.98).abs() < EPS);
        let segs = r.route(&pad(Side::Back, 3), false);
        assert!(segs[0].horizontal_offset() < EPS);
    }

    #[test]
    fn rejects_tight_pitch_for_bridge() {
        let tight = BusPitch { pad: 2.2, ..pitch() };
        let err = BusRouter::new(geometry(), tight, RoutingPolicy::default(), DEFAULT_SIGNAL_WIDTH)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Clearance { ref name, .. } if name == "pad_pitch"));
    }

    #[test]
    fn rejects_tight_pitch_for_direct_diagonal() {
        let tight = BusPitch {
            pad: 2.2,
            stagger: clearance_offset(2.2, 1.8),
            ..pitch()
        };
        let policy = RoutingPolicy {
            shape: RouteShape::Direct,
            ..RoutingPolicy::default()
        };
        let err = BusRouter::new(geometry(), tight, policy, DEFAULT_SIGNAL_WIDTH).unwrap_err();
        assert!(matches!(err, LayoutError::Clearance { ref name, .. } if name == "pad_pitch"));
    }

    #[test]
    fn rejects_direct_route_without_stagger() {
        let policy = RoutingPolicy {
            shape: RouteShape::Direct,
            ..RoutingPolicy::default()
        };
        assert!(BusRouter::new(geometry(), pitch(), policy, DEFAULT_SIGNAL_WIDTH).is_err());
    }

    #[test]
    fn segment_distance_clamps_to_ends() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 10.0);
        assert!((distance_to_segment(Point::new(3.0, 5.0), a, b) - 3.0).abs() < EPS);
        assert!((distance_to_segment(Point::new(0.0, 14.0), a, b) - 4.0).abs() < EPS);
        assert!((distance_to_segment(Point::new(3.0, -4.0), a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn rejects_overlapping_rows() {
        let tight = BusPitch { row: 1.5, ..pitch() };
        let err = BusRouter::new(geometry(), tight, RoutingPolicy::default(), DEFAULT_SIGNAL_WIDTH)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Clearance { ref name, .. } if name == "row_spacing"));
    }

    #[test]
    fn rejects_drill_larger_than_pad() {
        let err = BusRouter::new(
            PadGeometry::new(1.0, 1.2),
            pitch(),
            RoutingPolicy::default(),
            DEFAULT_SIGNAL_WIDTH,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));
    }
}
