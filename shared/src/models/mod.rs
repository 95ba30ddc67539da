//! Canonical entity schemas for the TrackNToms POS inventory core
//!
//! One schema per entity; field-name drift from older clients is absorbed
//! here with serde aliases so business logic never sees variant names.

mod consignment;
mod pullout;
mod purchase;

pub use consignment::*;
pub use pullout::*;
pub use purchase::*;
