//! CLI subcommand implementations.

pub mod comprobante;
pub mod deudas;
pub mod historial;
pub mod pagar;
pub mod retorno;
