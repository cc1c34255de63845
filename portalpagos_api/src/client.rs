//! HTTP client for the municipal payment backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{
    types::{HistorialRecord, PreferenceRequest, PreferenceResponse, RegistroDeuda},
    Error, SearchQuery,
};

/// Shape of the backend's error bodies: `{ "error": "..." }`.
#[derive(serde::Deserialize)]
struct BackendError {
    error: String,
}

/// HTTP client for the payment backend's REST API.
///
/// Every request is built fresh with a 30-second timeout, so a hung
/// backend can never leave a caller waiting indefinitely.
pub struct Client {
    /// Base URL for the API, including the `/api` prefix.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the local development backend.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:10000/api")
    }

    /// Creates a new client with a custom base URL. Also used for testing
    /// with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_url(&self, path: &str, query: Option<&SearchQuery>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    async fn read_body(resp: reqwest::Response) -> Result<(u16, String), Error> {
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;
        Ok((status, body))
    }

    fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, Error> {
        if !(200..300).contains(&status) {
            // The backend reports failures as `{ "error": msg }`; those
            // messages are meant for the user and pass through verbatim.
            if let Ok(be) = serde_json::from_str::<BackendError>(body) {
                tracing::error!("Backend error (status {}): {}", status, be.error);
                return Err(Error::Backend {
                    status,
                    message: be.error,
                });
            }
            let snippet = truncate_body(body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status,
                body: snippet,
            });
        }
        serde_json::from_str::<T>(body).map_err(|e| {
            tracing::error!("Failed to parse response: {} | body: {}", e, truncate_body(body));
            Error::RequestFailed
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&SearchQuery>,
    ) -> Result<T, Error> {
        let url = self.get_url(path, query)?;
        let resp = self
            .http()?
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;
        let (status, body) = Self::read_body(resp).await?;
        Self::parse_response(status, &body)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.get_url(path, None)?;
        let resp = self
            .http()?
            .post(url)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to post resource: {}", e);
                Error::RequestFailed
            })?;
        let (status, body) = Self::read_body(resp).await?;
        Self::parse_response(status, &body)
    }

    /// Searches one payment system for outstanding-debt records.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<RegistroDeuda>, Error> {
        self.get::<Vec<RegistroDeuda>>(query.sistema.search_path(), Some(query))
            .await
    }

    /// Creates a payment-gateway preference for the selected debts.
    pub async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<PreferenceResponse, Error> {
        self.post("/create_preference", request).await
    }

    /// Fetches the payment-history record for a gateway payment id.
    pub async fn history_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<HistorialRecord, Error> {
        self.get::<HistorialRecord>(
            format!("/get_history_by_payment_id/{}", payment_id).as_str(),
            None,
        )
        .await
    }

    /// Downloads the binary receipt document for a history record.
    pub async fn receipt(&self, record_id: &str) -> Result<Vec<u8>, Error> {
        let url = self.get_url(format!("/receipt/{}", record_id).as_str(), None)?;
        let resp = self.http()?.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to get receipt: {}", e);
            Error::RequestFailed
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if let Ok(be) = serde_json::from_str::<BackendError>(&body) {
                return Err(Error::Backend {
                    status: status.as_u16(),
                    message: be.error,
                });
            }
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!("Failed to read receipt body: {}", e);
            Error::RequestFailed
        })?;
        Ok(bytes.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
