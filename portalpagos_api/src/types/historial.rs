use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payment-history record, as returned by `/get_history_by_payment_id`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistorialRecord {
    pub id: String,
    pub fields: HistorialFields,
}

/// Payment fields stored in the history table. Names follow the backend
/// schema (capitalized Spanish).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistorialFields {
    #[serde(rename = "Monto")]
    pub monto: f64,
    #[serde(rename = "Estado")]
    pub estado: String,
    #[serde(rename = "MP_Payment_ID", default)]
    pub mp_payment_id: Option<String>,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
}
