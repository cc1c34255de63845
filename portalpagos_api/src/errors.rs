//! Error types for the API client.

/// Errors that can occur when talking to the payment backend.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("No se pudo conectar con el servidor")]
    RequestFailed,
    /// The backend reported an error through its `{ "error": ... }` body.
    /// The message is surfaced to the user verbatim.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// The backend returned a non-success status without a recognizable
    /// error body. Carries a body snippet for logging.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
