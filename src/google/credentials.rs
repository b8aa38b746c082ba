//! Service-account credential and OAuth token exchange

use crate::error::{DeckError, DeckResult};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Scopes requested for the single shared credential
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/presentations",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account key file that the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> DeckResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeckError::ServiceInit(format!(
                "Cannot read credential file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> DeckResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| DeckError::ServiceInit(format!("Invalid credential file: {}", e)))
    }

    /// Signed JWT assertion for the token endpoint
    fn assertion(&self, issued_at: i64) -> DeckResult<String> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPES.join(" "),
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };
        let header = Header {
            kid: self.private_key_id.clone(),
            ..Header::new(Algorithm::RS256)
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| DeckError::ServiceInit(format!("Invalid private key: {}", e)))?;
        encode(&header, &claims, &key)
            .map_err(|e| DeckError::ServiceInit(format!("Failed to sign assertion: {}", e)))
    }

    /// Exchange the signed assertion for a bearer token
    pub fn fetch_access_token(&self, client: &Client) -> DeckResult<String> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| DeckError::ServiceInit(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeckError::ServiceInit(format!(
                "Token request rejected ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| DeckError::ServiceInit(format!("Bad token response: {}", e)))?;
        Ok(token.access_token)
    }
}
