//! HTTP calls against the upstream WordPress site

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, COOKIE, REFERER, SET_COOKIE};
use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::nonce::extract_nonce;
use super::session::Session;
use crate::config::UpstreamConfig;
use crate::errors::{AppResult, SessionError, UpstreamError};
use crate::utils::http_client::{build_client, read_text, HttpClientOptions};
use crate::utils::UrlUtils;

const AJAX_ACTION: &str = "run_wds";
const AJAX_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Result of probing the login page, reported by diagnostics
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LoginPageCheck {
    pub login_page_accessible: bool,
    pub nonce_found: bool,
    pub extracted_nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct UpstreamClient {
    config: UpstreamConfig,
    client: Client,
    /// Redirects disabled so the login response's cookies stay visible
    login_client: Client,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let options = HttpClientOptions::new(config.user_agent.clone(), config.request_timeout);
        let client = build_client(&options)?;
        let login_client = build_client(&options.without_redirects())?;
        Ok(Self {
            config,
            client,
            login_client,
        })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Log in and collect a fresh session
    ///
    /// Credentials are checked before any request is made.
    pub async fn login(&self) -> AppResult<Session> {
        let (email, password) = self.config.credentials()?;

        let login_nonce = self.login_nonce().await?;

        let form = Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string())
            .text("name", "login")
            .text("action", AJAX_ACTION)
            .text("__nonce", login_nonce.clone());

        let ajax_url = self.config.ajax_url();
        info!(
            "Logging in to {}",
            UrlUtils::extract_domain(&ajax_url).unwrap_or_default()
        );

        let response = self
            .login_client
            .post(&ajax_url)
            .header(ACCEPT, "*/*")
            .header(REFERER, self.config.login_url())
            .multipart(form)
            .send()
            .await?;

        debug!("Login response status: {}", response.status());

        let cookies = collect_cookies(response.headers()).ok_or_else(|| {
            SessionError::auth_failed("Login failed: No cookies received")
        })?;

        let nonce = match self.dashboard_nonce(&cookies).await {
            Some(nonce) => nonce,
            None => {
                warn!("Could not extract nonce from dashboard, using login nonce as fallback");
                login_nonce
            }
        };

        info!(
            "Acquired upstream session (nonce {})",
            UrlUtils::mask_secret(&nonce)
        );
        Ok(Session::new(cookies, nonce))
    }

    /// Nonce scraped from the login page, or the configured fallback
    async fn login_nonce(&self) -> AppResult<String> {
        let check = self.check_login_page().await;
        if let Some(nonce) = check.extracted_nonce {
            return Ok(nonce);
        }

        match self.config.login_nonce.as_deref().filter(|n| !n.is_empty()) {
            Some(fallback) => {
                debug!("Login page nonce unavailable, using configured fallback");
                Ok(fallback.to_string())
            }
            None => Err(SessionError::auth_failed(
                "Could not obtain a login nonce and no fallback is configured",
            )
            .into()),
        }
    }

    /// Fetch the login page and try to extract its nonce
    pub async fn check_login_page(&self) -> LoginPageCheck {
        let login_url = self.config.login_url();
        let html = match self.client.get(&login_url).send().await {
            Ok(response) => read_text(response).await,
            Err(e) => Err(e.into()),
        };

        match html {
            Ok(html) => {
                let extracted_nonce = extract_nonce(&html);
                LoginPageCheck {
                    login_page_accessible: true,
                    nonce_found: extracted_nonce.is_some(),
                    extracted_nonce,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Login page unavailable: {}", e);
                LoginPageCheck {
                    error: Some(e.to_string()),
                    ..LoginPageCheck::default()
                }
            }
        }
    }

    async fn dashboard_nonce(&self, cookies: &str) -> Option<String> {
        let response = self
            .client
            .get(self.config.dashboard_url())
            .header(COOKIE, cookies)
            .send()
            .await;

        match response {
            Ok(response) => match read_text(response).await {
                Ok(html) => extract_nonce(&html),
                Err(e) => {
                    warn!("Dashboard fetch failed: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Dashboard request failed: {}", e);
                None
            }
        }
    }

    /// POST an AJAX action with the session's cookies and nonce
    ///
    /// Returns the decoded JSON body without interpreting `success`.
    pub async fn ajax(
        &self,
        session: &Session,
        name: &str,
        params: &[(&str, String)],
    ) -> AppResult<Value> {
        let mut form: Vec<(&str, &str)> = vec![
            ("name", name),
            ("action", AJAX_ACTION),
            ("__nonce", session.nonce.as_str()),
        ];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let ajax_url = self.config.ajax_url();
        debug!("AJAX {} -> {}", name, ajax_url);

        let response = self
            .client
            .post(&ajax_url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, AJAX_ACCEPT)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(COOKIE, session.cookies.as_str())
            .form(&form)
            .send()
            .await?;

        let body = read_text(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| UpstreamError::malformed(e.to_string()).into())
    }
}

/// Join the `name=value` part of every `Set-Cookie` header
pub fn collect_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    }
}
