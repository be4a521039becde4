//! card-edge-footprint: parametric card-edge connector footprint generator
//!
//! Builds PCB footprints for card-edge connectors and the backplanes that
//! carry them: gold fingers along the board edge, rows of plated
//! through-holes for each connector slot, and the traces that tie every
//! slot into one bus.
//!
//! # Architecture
//!
//! - **Layout engine**: pure geometry. Parameters in, primitives out.
//! - **Drawing surface**: the engine emits through a trait, so the output
//!   format is a separate concern.
//! - **Configuration**: a JSON file maps onto the layout parameters.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Configuration error types
//! - [`footprint`]: Footprint model, pad factories and output
//! - [`layout`]: Naming, grids, replication, routing and assembly

pub mod config;
pub mod error;
pub mod footprint;
pub mod layout;
