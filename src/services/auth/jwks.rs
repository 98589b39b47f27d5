//! JSON Web Key Set client.
//!
//! The identity provider publishes its public signing keys at
//! `https://{domain}/.well-known/jwks.json`. Keys rotate rarely, so the set
//! is cached for the lifetime of the process and refetched once when a
//! token arrives with a `kid` the cached set does not contain.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;
use url::Url;

// Bound on the outbound key-set fetch so a slow provider cannot hold
// request handling hostage.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("key set fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("no signing key matches the token key id")]
    UnknownKid,
    #[error("matched key cannot be used for verification")]
    UnsupportedKey,
}

#[derive(Clone)]
pub struct JwksClient {
    url: Url,
    http: reqwest::Client,
    cache: Arc<RwLock<Option<JwkSet>>>,
}

impl JwksClient {
    pub fn new(url: Url) -> Result<Self, JwksError> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            url,
            http,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Resolve the decoding key for `kid`.
    ///
    /// Checks the cached set first, then refreshes once. A `kid` that is
    /// still unknown after the refresh is reported as `UnknownKid`.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        if let Some(set) = self.cache.read().await.as_ref()
            && let Some(jwk) = set.find(kid)
        {
            return decoding_key_from(jwk);
        }

        let set = self.fetch().await?;
        let key = match set.find(kid) {
            Some(jwk) => decoding_key_from(jwk),
            None => Err(JwksError::UnknownKid),
        };

        *self.cache.write().await = Some(set);
        key
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        tracing::debug!(url = %self.url, "fetching signing key set");

        let set = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        Ok(set)
    }
}

fn decoding_key_from(jwk: &Jwk) -> Result<DecodingKey, JwksError> {
    DecodingKey::from_jwk(jwk).map_err(|_| JwksError::UnsupportedKey)
}
