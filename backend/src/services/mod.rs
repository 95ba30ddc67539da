//! Business logic services for the TrackNToms POS inventory core

pub mod consignment;
pub mod ingredient;
pub mod pullout;
pub mod purchase;
pub mod stock;

pub use consignment::ConsignmentService;
pub use ingredient::IngredientService;
pub use pullout::PulloutService;
pub use purchase::PurchaseService;
pub use stock::StockLedger;
