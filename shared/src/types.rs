//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Status of a purchase order.
///
/// Purchases carry a status for parity with pullouts, but stock is applied
/// unconditionally on create/edit; the field never gates the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    Pending,
    Approved,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseStatus::Pending),
            "approved" => Some(PurchaseStatus::Approved),
            _ => None,
        }
    }
}

/// Status of a pullout request.
///
/// Stock is deducted only on the `Pending -> Approved` transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PulloutStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl PulloutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PulloutStatus::Pending => "pending",
            PulloutStatus::Approved => "approved",
            PulloutStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PulloutStatus::Pending),
            "approved" => Some(PulloutStatus::Approved),
            "rejected" => Some(PulloutStatus::Rejected),
            _ => None,
        }
    }

    /// Whether a record in this status may still be edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, PulloutStatus::Pending)
    }
}
