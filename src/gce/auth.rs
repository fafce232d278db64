//! GCE Authentication
//!
//! Handles authentication using Application Default Credentials (ADC),
//! service account keys, or gcloud CLI credentials. Any failure to obtain or
//! refresh a token surfaces as [`GceError::Token`].

use crate::error::GceError;
use futures::future::BoxFuture;
use gcp_auth::TokenProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default scopes for Compute Engine API access.
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/compute"];

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Source of bearer tokens.
///
/// The production implementation wraps `gcp_auth`; tests supply fixed or
/// failing sources.
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh access token.
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, GceError>>;
}

struct AdcTokenSource {
    provider: Arc<dyn TokenProvider>,
}

impl TokenSource for AdcTokenSource {
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, GceError>> {
        Box::pin(async move {
            let token = self.provider.token(DEFAULT_SCOPES).await.map_err(|e| {
                tracing::error!("Access token refresh failed: {}", e);
                GceError::Token
            })?;
            Ok(token.as_str().to_string())
        })
    }
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Credentials holder with token caching.
#[derive(Clone)]
pub struct GceCredentials {
    source: Arc<dyn TokenSource>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl GceCredentials {
    /// Create credentials using Application Default Credentials.
    pub async fn application_default() -> Result<Self, GceError> {
        let provider = gcp_auth::provider().await.map_err(|e| {
            tracing::error!(
                "Failed to initialize GCP authentication ({}). \
                 Run 'gcloud auth application-default login'",
                e
            );
            GceError::Token
        })?;

        Ok(Self::from_source(Arc::new(AdcTokenSource { provider })))
    }

    /// Create credentials from an externally-supplied token source.
    pub fn from_source(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token for API calls, reusing the cached one while valid.
    pub async fn access_token(&self) -> Result<String, GceError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self.source.fetch_token().await?;
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        Ok(token)
    }

    /// Force refresh the token.
    pub async fn refresh_token(&self) -> Result<String, GceError> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.access_token().await
    }
}
