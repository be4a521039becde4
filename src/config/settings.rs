//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Every field has a default, so `{}` is a complete configuration that
//! builds the EXORbus backplane.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::layout::naming::{AlphaSkip, BackRowNumbering, NamingMode};
use crate::layout::params::{CardEdgeParams, LayoutVariant};

/// Log levels accepted in `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Connector replication settings.
    #[serde(default)]
    pub connectors: ConnectorsConfig,

    /// Finger and through-hole row settings.
    #[serde(default)]
    pub pads: PadsConfig,

    /// Through-hole pad size.
    #[serde(default)]
    pub through_hole: ThroughHoleConfig,

    /// Trace settings.
    #[serde(default)]
    pub traces: TracesConfig,

    /// Explicit layout variant; derived from the other settings if absent.
    #[serde(default)]
    pub variant: Option<LayoutVariant>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        let params = self.card_edge_params()?;
        params.validate()?;
        params.resolve_variant()?;
        Ok(())
    }

    /// Converts the configuration into layout parameters.
    ///
    /// Only parses; geometry is checked by [`CardEdgeParams::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if `skip_alpha` or `fat_traces` cannot be parsed.
    pub fn card_edge_params(&self) -> Result<CardEdgeParams, ConfigError> {
        let pads = &self.pads;
        Ok(CardEdgeParams {
            connector_count: self.connectors.count,
            connector_spacing: self.connectors.spacing,
            prefer_bottom: self.connectors.prefer_bottom_traces,
            position_count: pads.position_count,
            position_multiple: pads.position_multiple,
            naming: if pads.alpha_name {
                NamingMode::Alpha
            } else {
                NamingMode::Numeric
            },
            skip_alpha: AlphaSkip::parse(&pads.skip_alpha)?,
            first_index: pads.first_index,
            back_row: pads.back_row_numbering,
            row_spacing: pads.row_spacing,
            pad_length: pads.pad_length,
            pad_width: pads.pad_width,
            pad_pitch: pads.pad_pitch,
            fat_traces: CardEdgeParams::parse_fat_traces(&pads.fat_traces)?,
            stagger: pads.stagger_vias,
            via_diameter: self.through_hole.diameter,
            via_drill: self.through_hole.drill,
            signal_width: self.traces.signal_width,
            variant: self.variant,
        })
    }
}

/// Connector replication configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorsConfig {
    /// Number of connectors on the backplane; 0 for a plain card edge.
    #[serde(default = "default_connector_count")]
    pub count: usize,

    /// Pitch between connectors in mm.
    #[serde(default = "default_connector_spacing")]
    pub spacing: f64,

    /// Route signal traces on the bottom layer.
    #[serde(default)]
    pub prefer_bottom_traces: bool,
}

impl Default for ConnectorsConfig {
    fn default() -> Self {
        Self {
            count: default_connector_count(),
            spacing: default_connector_spacing(),
            prefer_bottom_traces: false,
        }
    }
}

const fn default_connector_count() -> usize {
    8
}

const fn default_connector_spacing() -> f64 {
    19.05
}

/// Pad row configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PadsConfig {
    /// Pads per row.
    #[serde(default = "default_position_count")]
    pub position_count: usize,

    /// `position_count` must be a multiple of this.
    #[serde(default = "default_one")]
    pub position_multiple: usize,

    /// Label the front row with letters instead of numbers.
    #[serde(default = "default_true")]
    pub alpha_name: bool,

    /// Letters never used in labels.
    #[serde(default = "default_skip_alpha")]
    pub skip_alpha: String,

    /// First number used in numeric labels.
    #[serde(default = "default_first_index")]
    pub first_index: u32,

    /// Back-row numbering: "continue", "mirror" or "shared".
    #[serde(default)]
    pub back_row_numbering: BackRowNumbering,

    /// Distance between the two through-hole rows in mm.
    #[serde(default = "default_row_spacing")]
    pub row_spacing: f64,

    /// Finger length in mm.
    #[serde(default = "default_pad_length")]
    pub pad_length: f64,

    /// Finger width in mm.
    #[serde(default = "default_pad_width")]
    pub pad_width: f64,

    /// Pad pitch in mm.
    #[serde(default = "default_pad_pitch")]
    pub pad_pitch: f64,

    /// Space-separated 1-based columns routed as power traces.
    #[serde(default = "default_fat_traces")]
    pub fat_traces: String,

    /// Stagger the back through-hole row.
    #[serde(default)]
    pub stagger_vias: bool,
}

impl Default for PadsConfig {
    fn default() -> Self {
        Self {
            position_count: default_position_count(),
            position_multiple: default_one(),
            alpha_name: default_true(),
            skip_alpha: default_skip_alpha(),
            first_index: default_first_index(),
            back_row_numbering: BackRowNumbering::default(),
            row_spacing: default_row_spacing(),
            pad_length: default_pad_length(),
            pad_width: default_pad_width(),
            pad_pitch: default_pad_pitch(),
            fat_traces: default_fat_traces(),
            stagger_vias: false,
        }
    }
}

const fn default_position_count() -> usize {
    43
}

const fn default_one() -> usize {
    1
}

const fn default_true() -> bool {
    true
}

fn default_skip_alpha() -> String {
    "GIOQ".to_string()
}

const fn default_first_index() -> u32 {
    1
}

const fn default_row_spacing() -> f64 {
    5.08
}

const fn default_pad_length() -> f64 {
    8.0
}

const fn default_pad_width() -> f64 {
    2.54
}

const fn default_pad_pitch() -> f64 {
    3.96
}

fn default_fat_traces() -> String {
    "1 2 3 11 16 20 21 22 41 42 43 9 17 24".to_string()
}

/// Through-hole pad configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThroughHoleConfig {
    /// Pad diameter in mm.
    #[serde(default = "default_via_diameter")]
    pub diameter: f64,

    /// Drill diameter in mm.
    #[serde(default = "default_via_drill")]
    pub drill: f64,
}

impl Default for ThroughHoleConfig {
    fn default() -> Self {
        Self {
            diameter: default_via_diameter(),
            drill: default_via_drill(),
        }
    }
}

const fn default_via_diameter() -> f64 {
    1.8
}

const fn default_via_drill() -> f64 {
    0.9
}

/// Trace configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracesConfig {
    /// Signal trace width in mm.
    #[serde(default = "default_signal_width")]
    pub signal_width: f64,
}

impl Default for TracesConfig {
    fn default() -> Self {
        Self {
            signal_width: default_signal_width(),
        }
    }
}

const fn default_signal_width() -> f64 {
    crate::layout::routing::DEFAULT_SIGNAL_WIDTH
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
