//! Validating wrapper around the backend API client.

use portalpagos_api::types::{
    HistorialRecord, PreferenceRequest, PreferenceResponse, RegistroDeuda, SistemaPago,
};
use portalpagos_api::{Client, SearchQuery};

use crate::asistente::{Asistente, ResultadoBusquedaAplicada};
use crate::error::PortalError;
use crate::validation;

/// API client wrapper that validates inputs before they reach the wire
/// and maps transport errors into the portal error type. No automatic
/// retries anywhere: every retry is a user-initiated re-submission.
pub struct ClientePortal {
    inner: Client,
}

impl Default for ClientePortal {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientePortal {
    /// Creates a client against the local development backend.
    pub fn new() -> Self {
        Self {
            inner: Client::new(),
        }
    }

    /// Creates a client with a custom base URL. Also used for testing.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
        }
    }

    /// Searches one payment system for debt records.
    pub async fn buscar(
        &self,
        sistema: SistemaPago,
        termino: &str,
    ) -> Result<Vec<RegistroDeuda>, PortalError> {
        let termino = validation::validar_termino(termino)?;
        tracing::debug!("buscando en {} por '{}'", sistema.nombre(), termino);
        let registros = self
            .inner
            .search(&SearchQuery::new(sistema, termino))
            .await?;
        tracing::debug!("la búsqueda devolvió {} registros", registros.len());
        Ok(registros)
    }

    /// Runs one full search round through a wizard: arms the ticket,
    /// performs the request, and feeds the response back.
    pub async fn buscar_en_asistente(
        &self,
        asistente: &mut Asistente,
        entrada: &str,
    ) -> Result<ResultadoBusquedaAplicada, PortalError> {
        let ticket = asistente.iniciar_busqueda(entrada)?;
        let registros = self
            .inner
            .search(&SearchQuery::new(asistente.sistema(), ticket.termino()))
            .await?;
        asistente.aplicar_busqueda(&ticket, registros)
    }

    /// Submits a preference request to the gateway.
    pub async fn crear_preferencia(
        &self,
        request: &PreferenceRequest,
    ) -> Result<PreferenceResponse, PortalError> {
        tracing::info!(
            "creando preferencia '{}' por ${:.2}",
            request.title,
            request.unit_price
        );
        Ok(self.inner.create_preference(request).await?)
    }

    /// Looks up the payment-history record for a gateway payment id.
    pub async fn historial(&self, payment_id: &str) -> Result<HistorialRecord, PortalError> {
        let payment_id = validation::validar_termino(payment_id)?;
        Ok(self.inner.history_by_payment_id(&payment_id).await?)
    }

    /// Downloads the binary receipt for a history record.
    pub async fn comprobante(&self, record_id: &str) -> Result<Vec<u8>, PortalError> {
        let record_id = validation::validar_termino(record_id)?;
        Ok(self.inner.receipt(&record_id).await?)
    }
}
