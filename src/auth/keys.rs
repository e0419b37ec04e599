use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

const SECURE_TOKEN_KEYS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

#[derive(Error, Debug)]
pub enum KeyFetchError {
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("no public key with kid {0}")]
    UnknownKid(String),
}

struct CachedKeys {
    keys: HashMap<String, String>,
    expires_at: Instant,
}

/// Fetches and caches Google's rotating secure-token signing certificates.
///
/// The cache TTL follows the `Cache-Control: max-age` header of the key
/// endpoint; a miss after a refresh means the kid is genuinely unknown.
pub struct PublicKeyManager {
    client: Client,
    cache: Arc<RwLock<Option<CachedKeys>>>,
}

impl PublicKeyManager {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<String, KeyFetchError> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        self.refresh().await?;

        self.cached_key(kid)
            .await
            .ok_or_else(|| KeyFetchError::UnknownKid(kid.to_string()))
    }

    async fn cached_key(&self, kid: &str) -> Option<String> {
        let cache = self.cache.read().await;
        let cached = cache.as_ref()?;
        if Instant::now() >= cached.expires_at {
            return None;
        }
        cached.keys.get(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), KeyFetchError> {
        let response = self.client.get(SECURE_TOKEN_KEYS_URL).send().await?;
        let ttl = cache_max_age(&response).unwrap_or(DEFAULT_KEY_TTL);
        let keys: HashMap<String, String> = response.json().await?;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + ttl,
        });
        Ok(())
    }
}

fn cache_max_age(response: &reqwest::Response) -> Option<Duration> {
    let header = response
        .headers()
        .get(reqwest::header::CACHE_CONTROL)?
        .to_str()
        .ok()?;
    header.split(',').find_map(|part| {
        part.trim()
            .strip_prefix("max-age=")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
    })
}
