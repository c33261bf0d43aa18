use std::time::Duration;

use gk_shared::errors::ErrorResponse;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Per-request timeout used by [`AuthClient::new`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Account created by [`AuthClient::register`]
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct VerifiedSubject {
    user_id: String,
}

/// Client for a Gatekeep server at `base_url`
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    http: Client,
}

impl AuthClient {
    /// Client with [`DEFAULT_TIMEOUT`]
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an account, returning the new user's id and email
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<RegisteredUser> {
        let request = self
            .http
            .post(self.url("/register"))
            .json(&Credentials { email, password });
        expect_json(send(request).await?).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Tokens> {
        let request = self
            .http
            .post(self.url("/login"))
            .json(&Credentials { email, password });
        expect_json(send(request).await?).await
    }

    /// Exchange `refresh_token` for a new pair; the old token stops working
    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<Tokens> {
        let request = self
            .http
            .post(self.url("/refresh"))
            .json(&RefreshBody { refresh_token });
        expect_json(send(request).await?).await
    }

    /// Revoke `access_token` and the session it belongs to
    pub async fn logout(&self, access_token: &str) -> ClientResult<()> {
        let request = self.http.post(self.url("/logout")).bearer_auth(access_token);
        let response = send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Resolve an access token to its user id
    ///
    /// Returns `ClientError::Cancelled` as soon as `cancel` fires.
    pub async fn verify_token(&self, token: &str, cancel: &CancellationToken) -> ClientResult<String> {
        let request = self.http.get(self.url("/verify")).bearer_auth(token);
        let call = async { expect_json::<VerifiedSubject>(send(request).await?).await };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = call => result.map(|verified| verified.user_id),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/auth{}", self.base_url, path)
    }
}

async fn send(request: RequestBuilder) -> ClientResult<Response> {
    let response = request.send().await?;
    debug!(url = %response.url(), status = response.status().as_u16(), "Gatekeep call completed");
    Ok(response)
}

async fn expect_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

/// Build a status error, keeping the server's error code and message when
/// the body is a standard error response
async fn status_error(response: Response) -> ClientError {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => ClientError::Status {
            status: status.as_u16(),
            code: Some(body.error),
            message: body.message,
        },
        Err(_) => ClientError::Status {
            status: status.as_u16(),
            code: None,
            message: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        },
    }
}
