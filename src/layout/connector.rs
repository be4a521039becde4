//! Connector replication along the backplane axis.

use crate::layout::grid::GridSpec;

/// One replicated connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorInstance {
    /// 0-based connector number, counted from the card edge.
    pub index: usize,
    /// The connector's through-hole rows, already translated into place.
    pub grid: GridSpec,
    /// Translation applied to the unit grid (mm).
    pub offset: f64,
    /// True for the connector nearest the card edge.
    pub edge_adjacent: bool,
}

impl ConnectorInstance {
    /// Returns true if the connector has a back row.
    #[must_use]
    pub const fn has_back_row(&self) -> bool {
        self.grid.rows > 1
    }
}

/// Repeats a connector unit along the spacing axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectorReplicator;

impl ConnectorReplicator {
    /// Creates a new replicator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Places `connector_count` copies of `unit`, each one `connector_pitch`
    /// further from the card edge than the last.
    ///
    /// A count of zero still yields one connector: a single through-hole row
    /// feeding the front fingers, with no back row.
    ///
    /// Labels come from the unit's namer unchanged, so every connector on the
    /// bus carries the same label set as the fingers.
    #[must_use]
    pub fn build(
        &self,
        unit: &GridSpec,
        connector_count: usize,
        connector_pitch: f64,
    ) -> Vec<ConnectorInstance> {
        if connector_count == 0 {
            let single = GridSpec {
                rows: 1,
                pitch_y: 0.0,
                stagger: 0.0,
                ..unit.clone()
            };
            return vec![Self::instance(&single, 0, connector_pitch)];
        }

        (0..connector_count)
            .map(|index| Self::instance(unit, index, connector_pitch))
            .collect()
    }

    #[allow(clippy::cast_precision_loss)] // connector counts are small
    fn instance(unit: &GridSpec, index: usize, connector_pitch: f64) -> ConnectorInstance {
        let offset = -connector_pitch * (index + 1) as f64;
        ConnectorInstance {
            index,
            grid: unit.translated(0.0, offset),
            offset,
            edge_adjacent: index == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicates_along_negative_y() {
        let unit = GridSpec::dual_row(4, 3.96, 5.08);
        let instances = ConnectorReplicator::new().build(&unit, 3, 19.05);
        assert_eq!(instances.len(), 3);
        for (k, inst) in instances.iter().enumerate() {
            assert_eq!(inst.index, k);
            assert!(inst.has_back_row());
            assert!((inst.grid.centre.y - -19.05 * (k as f64 + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn only_first_instance_is_edge_adjacent() {
        let unit = GridSpec::dual_row(4, 3.96, 5.08);
        let instances = ConnectorReplicator::new().build(&unit, 8, 19.05);
        assert_eq!(instances.iter().filter(|i| i.edge_adjacent).count(), 1);
        assert!(instances[0].edge_adjacent);
    }

    #[test]
    fn zero_connectors_yields_single_front_row() {
        let unit = GridSpec::dual_row(43, 3.96, 5.08).with_stagger(1.98);
        let instances = ConnectorReplicator::new().build(&unit, 0, 19.05);
        assert_eq!(instances.len(), 1);
        assert!(!instances[0].has_back_row());
        assert!(instances[0].edge_adjacent);
        assert_eq!(instances[0].grid.len(), 43);
    }

    #[test]
    fn labels_repeat_on_every_connector() {
        let unit = GridSpec::dual_row(5, 3.96, 5.08);
        let instances = ConnectorReplicator::new().build(&unit, 2, 19.05);
        let labels =
            |i: &ConnectorInstance| i.grid.pads().into_iter().map(|p| p.label).collect::<Vec<_>>();
        assert_eq!(labels(&instances[0]), labels(&instances[1]));
    }
}
