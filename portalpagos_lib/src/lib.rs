//! Library layer for the municipal payment portal: the debt search &
//! selection wizard, input validation, and a validating client over the
//! backend API.
//!
//! Wraps the `portalpagos_api` crate and keeps the wizard core pure
//! (sans-IO) so every step of the flow is unit-testable without a
//! running backend.

pub mod asistente;
pub mod client;
pub mod error;
pub mod filtro;
pub mod meses;
pub mod pago;
pub mod retorno;
pub mod transform;
pub mod validation;

pub use portalpagos_api;
pub use portalpagos_api::types;
pub use portalpagos_api::types::SistemaPago;
pub use portalpagos_api::SearchQuery;

pub use asistente::{Asistente, Paso, ResultadoBusquedaAplicada, TicketBusqueda};
pub use client::ClientePortal;
pub use error::PortalError;
pub use meses::Mes;
pub use retorno::{EstadoPago, Retorno};
pub use transform::{transformar, DeudaItem, ResultadoBusqueda, TipoItem};
