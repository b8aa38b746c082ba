//! Authenticated JSON transport shared by the three service handles

use crate::error::{DeckError, DeckResult};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct ApiTransport {
    client: Client,
    access_token: String,
}

impl ApiTransport {
    pub fn new(client: Client, access_token: String) -> Self {
        Self {
            client,
            access_token,
        }
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: Url) -> DeckResult<T> {
        self.send(self.client.get(url))
    }

    pub fn post_json<B, T>(&self, url: Url, body: &B) -> DeckResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.post(url).json(body))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> DeckResult<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| DeckError::Remote(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeckError::Remote(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .map_err(|e| DeckError::Remote(format!("Failed to parse response: {}", e)))
    }
}

/// Append percent-encoded path segments to a base URL
pub fn endpoint(base: &str, segments: &[&str]) -> DeckResult<Url> {
    let mut url =
        Url::parse(base).map_err(|e| DeckError::Remote(format!("Bad base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| DeckError::Remote(format!("Base URL {} cannot take a path", base)))?
        .extend(segments);
    Ok(url)
}
