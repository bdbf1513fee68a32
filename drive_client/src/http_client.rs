use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use tracing::debug;

use crate::auth::AuthConfig;
use crate::error::Result;

/// Blocking HTTP client with per-request bearer-token injection.
///
/// Redirect following is turned off: the resumable-upload protocol answers
/// chunk PUTs with 308, which must reach the caller, not the redirect policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    auth: AuthConfig,
}

impl HttpClient {
    pub fn new(auth: &Option<AuthConfig>, user_agent: &str) -> Result<Self> {
        let auth = match auth {
            Some(cfg) => cfg.clone(),
            None => {
                debug!("drive auth disabled");
                AuthConfig::default()
            },
        };

        let client = Client::builder()
            .user_agent(user_agent.to_owned())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, auth })
    }

    /// Start a request with the auth header already attached.
    pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let mut req = self.client.request(method, url);
        if let Some(token) = self.auth.current_token()? {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(req)
    }
}
