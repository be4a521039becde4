//! End-to-end footprint generation scenarios.
//!
//! These tests build complete footprints through the public API and check
//! the emitted pads and traces against the expected bus layout.

use card_edge_footprint::footprint::{
    DrawingSurface, Footprint, Layer, LayerSet, Pad, PadTemplate, Text,
};
use card_edge_footprint::layout::{
    AlphaSkip, CardEdgeParams, FootprintAssembler, LayoutVariant, Namer, Point, Rect, TraceKind,
    TraceSegment,
};

const EPS: f64 = 1e-6;

fn build(params: CardEdgeParams) -> Footprint {
    FootprintAssembler::new(params)
        .expect("Failed to create assembler")
        .build()
}

fn through_pads(fp: &Footprint) -> impl Iterator<Item = &Pad> {
    fp.pads.iter().filter(|p| p.drill.is_some())
}

// =============================================================================
// Plain card edge
// =============================================================================

#[test]
fn test_plain_card_edge_reuses_finger_labels() {
    let params = CardEdgeParams {
        connector_count: 0,
        ..CardEdgeParams::default()
    };
    let fp = build(params);

    let fingers: Vec<_> = fp
        .pads
        .iter()
        .filter(|p| p.layers == LayerSet::FRONT_SMD)
        .collect();
    let through: Vec<_> = through_pads(&fp).collect();

    assert_eq!(fingers.len(), 43);
    assert_eq!(through.len(), 43);
    assert_eq!(fp.pads.len(), 86);

    let expected = Namer::alpha(AlphaSkip::parse("GIOQ").unwrap()).row_labels(0, 43);
    let finger_labels: Vec<_> = fingers.iter().map(|p| p.designator.clone()).collect();
    let through_labels: Vec<_> = through.iter().map(|p| p.designator.clone()).collect();
    assert_eq!(finger_labels, expected);
    assert_eq!(through_labels, expected);

    assert_eq!(expected[5], "F");
    let p = expected.iter().position(|l| l == "P").unwrap();
    assert_eq!(expected[p + 1], "R");
    assert!(expected
        .iter()
        .all(|l| !matches!(l.as_str(), "G" | "I" | "O" | "Q" | "g" | "i" | "o" | "q")));
}

#[test]
fn test_plain_card_edge_has_no_back_copper_fingers() {
    let params = CardEdgeParams {
        connector_count: 0,
        ..CardEdgeParams::default()
    };
    let fp = build(params);

    assert!(fp
        .pads
        .iter()
        .filter(|p| p.drill.is_none())
        .all(|p| !p.layers.has_back_copper()));
    assert_eq!(fp.tracks_on(Layer::BackCopper).count(), 0);
}

#[test]
fn test_plain_card_edge_routes_to_finger_centres() {
    let params = CardEdgeParams {
        connector_count: 0,
        ..CardEdgeParams::default()
    };
    let fp = build(params);

    assert_eq!(fp.tracks.len(), 43);
    for (track, pad) in fp.tracks.iter().zip(through_pads(&fp)) {
        assert!((track.start.x - pad.position.x).abs() < EPS);
        assert!((track.start.y - -19.05).abs() < EPS);
        assert!(track.end.y.abs() < EPS);
        assert!(track.horizontal_offset() < EPS);
    }
}

// =============================================================================
// EXORbus backplane
// =============================================================================

fn exorbus_with_three_fat() -> CardEdgeParams {
    CardEdgeParams {
        connector_count: 8,
        stagger: false,
        fat_traces: CardEdgeParams::parse_fat_traces("1 2 3").unwrap(),
        ..CardEdgeParams::default()
    }
}

#[test]
fn test_backplane_replicates_eight_row_pairs() {
    let fp = build(exorbus_with_three_fat());

    let through: Vec<_> = through_pads(&fp).collect();
    assert_eq!(through.len(), 8 * 2 * 43);

    for k in 0..8 {
        let centre = -19.05 * (k as f64 + 1.0);
        let front = through
            .iter()
            .filter(|p| (p.position.y - (centre + 2.54)).abs() < EPS)
            .count();
        let back = through
            .iter()
            .filter(|p| (p.position.y - (centre - 2.54)).abs() < EPS)
            .count();
        assert_eq!(front, 43, "front row of connector {k}");
        assert_eq!(back, 43, "back row of connector {k}");
    }
}

#[test]
fn test_backplane_fat_columns_on_both_layers() {
    let fp = build(exorbus_with_three_fat());

    let power: Vec<&TraceSegment> = fp
        .tracks
        .iter()
        .filter(|t| t.kind == TraceKind::Power)
        .collect();

    // 3 columns x 2 rows x 8 connectors, one vertical segment each
    assert_eq!(power.len(), 48);
    assert!(power.iter().all(|t| t.horizontal_offset() < EPS));
    assert!(power.iter().all(|t| (t.width - 1.35).abs() < EPS));
    assert_eq!(
        power.iter().filter(|t| t.layer == Layer::FrontCopper).count(),
        24
    );
    assert_eq!(
        power.iter().filter(|t| t.layer == Layer::BackCopper).count(),
        24
    );

    // Columns 1..=3 sit at the left end of the row
    let max_x = -3.96 * 21.0 + 3.96 * 2.0;
    assert!(power.iter().all(|t| t.start.x < max_x + EPS));
}

#[test]
fn test_only_first_connector_uses_short_edge_trace() {
    let fp = build(exorbus_with_three_fat());
    let short = 19.05 - 5.08;

    let stubs: Vec<_> = fp
        .tracks
        .iter()
        .filter(|t| (t.length() - short).abs() < EPS)
        .collect();

    assert_eq!(stubs.len(), 43);
    assert!(stubs
        .iter()
        .all(|t| (t.start.y - (-19.05 + 2.54)).abs() < EPS));
    assert!(stubs.iter().all(|t| t.layer == Layer::FrontCopper));
}

#[test]
fn test_back_fingers_carry_back_row_labels() {
    let fp = build(CardEdgeParams::default());

    let back: Vec<_> = fp
        .pads
        .iter()
        .filter(|p| p.layers == LayerSet::BACK_SMD)
        .collect();
    assert_eq!(back.len(), 43);
    assert_eq!(back[0].designator, "1");
    assert_eq!(back[42].designator, "43");
    assert!((back[0].position.x - fp.pads[0].position.x).abs() < EPS);
}

#[test]
fn test_emission_order() {
    let fp = build(CardEdgeParams {
        connector_count: 2,
        ..CardEdgeParams::default()
    });

    // Fingers first, front then back
    assert!(fp.pads[..43].iter().all(|p| p.layers == LayerSet::FRONT_SMD));
    assert!(fp.pads[43..86].iter().all(|p| p.layers == LayerSet::BACK_SMD));
    // Then connector 0 before connector 1
    assert!(fp.pads[86..172].iter().all(|p| p.position.y > -19.05 - 3.0));
    assert!(fp.pads[172..].iter().all(|p| p.position.y < -38.1 + 3.0));

    assert_eq!(fp.name, "Card_Edge_Connector-43");
    assert_eq!(fp.description, fp.name);
    assert_eq!(fp.text[0].text, "Card_Edge_Connector-43");
    assert_eq!(fp.text[1].text, "REF**");
    assert!((fp.text[0].position.y - -7.62).abs() < EPS);
    assert!((fp.text[1].position.y - -12.7).abs() < EPS);
}

// =============================================================================
// Variants
// =============================================================================

#[test]
fn test_variants_resolve_from_options() {
    let zigzag = FootprintAssembler::new(CardEdgeParams::default()).unwrap();
    assert_eq!(zigzag.variant(), LayoutVariant::ZigZag);

    let staggered = FootprintAssembler::new(CardEdgeParams {
        stagger: true,
        ..CardEdgeParams::default()
    })
    .unwrap();
    assert_eq!(staggered.variant(), LayoutVariant::Staggered);

    let stitched = FootprintAssembler::new(CardEdgeParams {
        variant: Some(LayoutVariant::Stitched),
        ..CardEdgeParams::default()
    })
    .unwrap();
    assert_eq!(stitched.variant(), LayoutVariant::Stitched);
}

#[test]
fn test_stitched_routes_are_straight() {
    let fp = build(CardEdgeParams {
        variant: Some(LayoutVariant::Stitched),
        ..CardEdgeParams::default()
    });

    // One segment per through-hole pad
    assert_eq!(fp.tracks.len(), 8 * 86);
    assert!(fp.tracks.iter().all(|t| t.horizontal_offset() < EPS));
}

#[test]
fn test_zigzag_bridges_have_three_segments() {
    let fp = build(CardEdgeParams {
        connector_count: 2,
        fat_traces: Default::default(),
        ..CardEdgeParams::default()
    });

    // Edge front row: one stub each; everything else: bent bridge
    let expected = 43 + 43 * 3 + 86 * 3;
    assert_eq!(fp.tracks.len(), expected);
}

// =============================================================================
// Custom drawing surface
// =============================================================================

#[derive(Default)]
struct Counter {
    pads: usize,
    tracks: usize,
    boxes: Vec<Rect>,
    text: usize,
}

impl DrawingSurface for Counter {
    fn add_pad(&mut self, _template: &PadTemplate, _position: Point, _designator: &str) {
        self.pads += 1;
    }

    fn add_track(&mut self, _segment: TraceSegment) {
        self.tracks += 1;
    }

    fn add_box(&mut self, rect: Rect, layer: Layer, _line_width: f64) {
        assert_eq!(layer, Layer::FrontCourtyard);
        self.boxes.push(rect);
    }

    fn add_text(&mut self, _text: Text) {
        self.text += 1;
    }
}

#[test]
fn test_assemble_onto_custom_surface() {
    let assembler = FootprintAssembler::new(CardEdgeParams::default()).unwrap();
    let mut surface = Counter::default();
    let summary = assembler.assemble(&mut surface);

    assert_eq!(summary.pads, surface.pads);
    assert_eq!(summary.tracks, surface.tracks);
    assert_eq!(summary.connectors, 8);
    assert_eq!(surface.boxes.len(), 1);
    assert_eq!(surface.text, 2);

    let courtyard = surface.boxes[0];
    assert!((courtyard.width() - 171.7).abs() < EPS);
    assert!((courtyard.max_y - 4.0).abs() < EPS);
}

#[test]
fn test_output_formats() {
    let fp = build(CardEdgeParams {
        connector_count: 1,
        ..CardEdgeParams::default()
    });

    let json = fp.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pads"].as_array().map(Vec::len), Some(43 * 2 + 86));

    let mut csv = Vec::new();
    fp.write_pad_table(&mut csv).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert_eq!(text.lines().count(), 1 + 43 * 2 + 86);
}
