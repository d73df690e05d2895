use std::time::Duration;

use reqwest::{redirect, Client, Response};
use tracing::debug;

use crate::errors::{AppError, AppResult, UpstreamError};
use crate::utils::url::UrlUtils;

/// Settings shared by every outgoing client
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// The login POST must not follow the post-login redirect or its cookies are lost
    pub follow_redirects: bool,
}

impl HttpClientOptions {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(10)),
            follow_redirects: true,
        }
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// Build a reqwest client from the given options
pub fn build_client(options: &HttpClientOptions) -> AppResult<Client> {
    let policy = if options.follow_redirects {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };

    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .redirect(policy)
        .build()
        .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))
}

/// Read a successful response as text, mapping non-2xx to a status error
pub async fn read_text(response: Response) -> AppResult<String> {
    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
        debug!(
            "HTTP {} from {}",
            status.as_u16(),
            UrlUtils::obfuscate_credentials(&url)
        );
        return Err(UpstreamError::status(status.as_u16(), url).into());
    }

    let body = response.text().await?;
    debug!(
        "Fetched {} bytes from {}",
        body.len(),
        UrlUtils::obfuscate_credentials(&url)
    );
    Ok(body)
}
