//! Shared types and models for the TrackNToms POS inventory core
//!
//! This crate contains the canonical entity schemas, status enums, and
//! pure validation/money helpers shared between the backend and its tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
