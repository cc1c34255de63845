use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Municipal payment system. Selects the backend search endpoint, the
/// query parameter carrying the search key, and the field-mapping rules
/// applied to the raw records it returns.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SistemaPago {
    /// Tasas retributivas (property-linked municipal taxes).
    Tasas,
    /// Water service (residential and commercial).
    Agua,
    /// Vehicle registration tax.
    Patente,
    /// Generic installment plans ("Plan de Pago").
    Otras,
}

impl SistemaPago {
    /// Path of the search endpoint, relative to the API base.
    pub fn search_path(&self) -> &'static str {
        match self {
            SistemaPago::Tasas => "/search/contributivo",
            SistemaPago::Agua => "/search/agua",
            SistemaPago::Patente => "/search/patente",
            SistemaPago::Otras => "/search/deuda",
        }
    }

    /// Name of the query parameter carrying the search key.
    pub fn search_param(&self) -> &'static str {
        match self {
            SistemaPago::Tasas | SistemaPago::Agua => "query",
            SistemaPago::Patente => "dni",
            SistemaPago::Otras => "nombre",
        }
    }

    /// Item type tag the backend expects in payment payloads.
    pub fn item_type(&self) -> &'static str {
        match self {
            SistemaPago::Tasas => "lote",
            SistemaPago::Agua => "agua",
            SistemaPago::Patente => "vehiculo",
            SistemaPago::Otras => "deuda_general",
        }
    }

    /// Human-readable system name, used in payment titles and screens.
    pub fn nombre(&self) -> &'static str {
        match self {
            SistemaPago::Tasas => "Tasas Retributivas",
            SistemaPago::Agua => "Agua",
            SistemaPago::Patente => "Patente Automotor",
            SistemaPago::Otras => "Plan de Pago",
        }
    }
}

impl std::fmt::Display for SistemaPago {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.nombre())
    }
}

impl FromStr for SistemaPago {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tasas" => Ok(SistemaPago::Tasas),
            "agua" => Ok(SistemaPago::Agua),
            "patente" => Ok(SistemaPago::Patente),
            "otras" | "plan-de-pago" | "plan_de_pago" => Ok(SistemaPago::Otras),
            _ => Err(format!(
                "sistema desconocido '{}'. Valores: tasas, agua, patente, plan-de-pago",
                s
            )),
        }
    }
}
