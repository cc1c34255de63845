use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description of what is being paid, sent to `/create_preference`.
///
/// Field names match the backend contract exactly. `meses` and
/// `meses_montos` are keyed by lowercase Spanish month name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PaymentPayload {
    pub record_id: String,
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_contribuyente: Option<String>,
    pub email: String,
    pub total_amount: f64,
    /// Whether an accumulated/general debt item is part of the payment.
    pub deuda: bool,
    pub deuda_monto: f64,
    pub meses: BTreeMap<String, bool>,
    pub meses_montos: BTreeMap<String, f64>,
}

/// Request body for `/create_preference`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PreferenceRequest {
    pub items_to_pay: PaymentPayload,
    pub title: String,
    pub unit_price: f64,
}

/// Response from `/create_preference`. The gateway may return a
/// production URL, a sandbox URL, both, or neither.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PreferenceResponse {
    #[serde(default)]
    pub preference_id: Option<String>,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}
