//! Payment Mode Model

use serde::{Deserialize, Serialize};

/// Form of payment proof a concession accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofMode {
    /// Transaction reference typed by the customer
    Text,
    /// Reference to an already uploaded screenshot
    Screenshot,
}

/// Payment method configured by a concession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMode {
    pub id: i64,
    /// Type label (e.g. "Cash", "GCash")
    pub label: String,
    /// Free-text instructions shown to the customer
    #[serde(default)]
    pub details: String,
    pub needs_proof: bool,
    /// Required when `needs_proof` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_mode: Option<ProofMode>,
}

impl PaymentMode {
    /// Cash-on-pickup style mode that needs no proof
    pub fn without_proof(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            details: String::new(),
            needs_proof: false,
            proof_mode: None,
        }
    }

    pub fn with_proof(id: i64, label: impl Into<String>, mode: ProofMode) -> Self {
        Self {
            id,
            label: label.into(),
            details: String::new(),
            needs_proof: true,
            proof_mode: Some(mode),
        }
    }
}
