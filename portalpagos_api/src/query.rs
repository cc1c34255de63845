//! Search query construction for the per-system search endpoints.

use url::Url;

use crate::types::SistemaPago;

/// A debt search against one payment system. Serializes to
/// `GET {base}/search/<endpoint>?<param>=<term>`, where both the endpoint
/// and the parameter name depend on the system.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub sistema: SistemaPago,
    pub termino: String,
}

impl SearchQuery {
    pub fn new(sistema: SistemaPago, termino: impl Into<String>) -> Self {
        Self {
            sistema,
            termino: termino.into(),
        }
    }

    /// Appends this query's parameter to the given URL, returning the
    /// modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair(self.sistema.search_param(), &self.termino);
        url
    }
}
