pub mod error;
pub mod types;

pub use error::{OmdbError, Result};
pub use types::{Lookup, SearchHit, SearchPayload, TitleDetail};

use std::time::Duration;

use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch one page (1-based) of search results, optionally scoped to a
    /// type (`movie`, `series`).
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        kind: Option<&str>,
    ) -> Result<Lookup<SearchPayload>> {
        let mut params = vec![("s", query.to_string()), ("page", page.to_string())];
        if let Some(kind) = kind {
            params.push(("type", kind.to_string()));
        }

        let lookup = self.get(&params).await?;
        if let Lookup::NotFound(ref message) = lookup {
            tracing::debug!(query, page, message = message.as_str(), "Search returned no results");
        }
        Ok(lookup)
    }

    /// Fetch the full record for a single title by IMDb id.
    pub async fn title(&self, imdb_id: &str) -> Result<Lookup<TitleDetail>> {
        let lookup = self.get(&[("i", imdb_id.to_string())]).await?;
        if let Lookup::NotFound(ref message) = lookup {
            tracing::debug!(imdb_id, message = message.as_str(), "Title lookup missed");
        }
        Ok(lookup)
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<Lookup<T>> {
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OmdbError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        types::classify(&body)
    }
}
