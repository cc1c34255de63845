//! Error types for the library layer.

use std::fmt;

/// Errors produced by the wizard and its client wrapper, wrapping
/// upstream API errors and adding the flow's own business failures.
#[derive(Debug)]
pub enum PortalError {
    /// An error from the underlying API client.
    Api(portalpagos_api::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The search or selection produced no payable debt.
    SinDeudas,
    /// An operation was attempted in a step that does not allow it.
    PasoInvalido(&'static str),
    /// The gateway returned neither a production nor a sandbox
    /// redirect URL.
    SinUrlDePago,
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::InvalidInput(msg) => write!(f, "Entrada inválida: {}", msg),
            Self::SinDeudas => write!(
                f,
                "No se encontraron deudas para los datos ingresados. \
                 Verifique la información e intente nuevamente."
            ),
            Self::PasoInvalido(op) => write!(f, "Operación no disponible en este paso: {}", op),
            Self::SinUrlDePago => write!(
                f,
                "No se recibió una URL de inicio de pago de Mercado Pago."
            ),
            Self::Serialization(e) => write!(f, "Error de serialización: {}", e),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<portalpagos_api::Error> for PortalError {
    fn from(e: portalpagos_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
