use std::fmt::Debug;
use std::sync::Arc;

/// Helper to provide bearer tokens for outbound requests.
pub trait TokenProvider: Debug + Send + Sync {
    /// Return a currently valid bearer token.
    fn bearer_token(&self) -> Result<String, anyhow::Error>;
}

/// Shared configuration for token-based auth.
///
/// The token itself comes from an external authorization flow; this crate
/// only attaches it to requests.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Fixed token to use when no provider is configured.
    pub token: Option<String>,
    /// A function to refresh tokens; consulted before the fixed token.
    pub token_provider: Option<Arc<dyn TokenProvider>>,
}

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            token_provider: None,
        }
    }

    pub(crate) fn current_token(&self) -> Result<Option<String>, anyhow::Error> {
        if let Some(provider) = &self.token_provider {
            return provider.bearer_token().map(Some);
        }
        Ok(self.token.clone())
    }
}
