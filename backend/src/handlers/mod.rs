//! HTTP handlers for the TrackNToms POS inventory core

pub mod consignment;
pub mod health;
pub mod ingredient;
pub mod pullout;
pub mod purchase;

pub use consignment::*;
pub use health::*;
pub use ingredient::*;
pub use pullout::*;
pub use purchase::*;

use serde::Serialize;

/// Body returned by delete endpoints
#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
