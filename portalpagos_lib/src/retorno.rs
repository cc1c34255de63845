//! Return-redirect handling: interpreting the URL the payment gateway
//! sends the user back to.
//!
//! The query string is attacker-manipulable input, so anything missing
//! or malformed routes to the main menu with a log record instead of a
//! user-facing error.

use serde::Deserialize;
use url::Url;

/// Final payment status reported by the gateway.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EstadoPago {
    Aprobado,
    Pendiente,
    Rechazado,
    Otro(String),
}

impl EstadoPago {
    fn parse(status: &str) -> EstadoPago {
        match status {
            "approved" | "success" => EstadoPago::Aprobado,
            "pending" | "in_process" => EstadoPago::Pendiente,
            "rejected" | "failure" => EstadoPago::Rechazado,
            otro => EstadoPago::Otro(otro.to_string()),
        }
    }
}

impl std::fmt::Display for EstadoPago {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstadoPago::Aprobado => write!(f, "Aprobado"),
            EstadoPago::Pendiente => write!(f, "Pendiente"),
            EstadoPago::Rechazado => write!(f, "Rechazado"),
            EstadoPago::Otro(s) => write!(f, "{}", s),
        }
    }
}

/// Where the return URL sends the user.
#[derive(Clone, PartialEq, Debug)]
pub enum Retorno {
    /// A parseable gateway redirect: show the result screen.
    Resultado {
        estado: EstadoPago,
        payment_id: String,
        historial_record_id: String,
    },
    /// Missing or malformed parameters: show the main menu.
    MenuPrincipal,
}

/// Payload the backend embeds in `external_reference` (URL-encoded JSON).
#[derive(Deserialize)]
struct ReferenciaExterna {
    #[serde(rename = "historialRecordId")]
    historial_record_id: String,
}

/// Interprets a gateway return URL. Requires `status`, `payment_id`,
/// and an `external_reference` JSON carrying the history record id; any
/// other shape yields [`Retorno::MenuPrincipal`].
pub fn interpretar(url: &str) -> Retorno {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("URL de retorno inválida: {}", e);
            return Retorno::MenuPrincipal;
        }
    };
    let mut status = None;
    let mut payment_id = None;
    let mut external_reference = None;
    for (clave, valor) in parsed.query_pairs() {
        match clave.as_ref() {
            "status" => status = Some(valor.into_owned()),
            "payment_id" => payment_id = Some(valor.into_owned()),
            "external_reference" => external_reference = Some(valor.into_owned()),
            _ => {}
        }
    }
    let (Some(status), Some(payment_id), Some(referencia)) =
        (status, payment_id, external_reference)
    else {
        tracing::warn!("retorno sin parámetros completos; volviendo al menú");
        return Retorno::MenuPrincipal;
    };
    let referencia: ReferenciaExterna = match serde_json::from_str(&referencia) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("external_reference no parseable: {}", e);
            return Retorno::MenuPrincipal;
        }
    };
    Retorno::Resultado {
        estado: EstadoPago::parse(&status),
        payment_id,
        historial_record_id: referencia.historial_record_id,
    }
}

/// Strips the query and fragment so a refresh cannot reprocess the
/// gateway parameters.
pub fn sin_parametros(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.to_string())
}
