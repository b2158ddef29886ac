use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::{API_KEY_HEADER, decode, endpoint, transport, upstream_error, with_trailing_slash};
use crate::domain::{AuthGateway, ProviderError, SessionHandle, SessionProvider, SignUpRequest};
use crate::interface_adapters::protocol::{
    PasswordGrant, RefreshGrant, SignUpBody, SignUpMetadata, TokenResponse,
};

// Thin reqwest client for the hosted auth API. Holds the live session in memory.
pub struct SupabaseAuth {
    http: Client,
    base_url: Url,
    anon_key: String,
    // Held across a refresh so concurrent readers never refresh twice.
    session: Mutex<Option<SessionHandle>>,
}

fn now_epoch_seconds() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

impl SupabaseAuth {
    pub fn new(
        base_url: Url,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            anon_key: anon_key.into(),
            session: Mutex::new(None),
        })
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: &impl Serialize,
    ) -> Result<SessionHandle, ProviderError> {
        let mut url = endpoint(&self.base_url, "auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let token = response.json::<TokenResponse>().await.map_err(decode)?;
        Ok(token.into_session(now_epoch_seconds()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionHandle, ProviderError> {
        self.token_grant("refresh_token", &RefreshGrant { refresh_token })
            .await
    }
}

#[async_trait]
impl SessionProvider for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<SessionHandle>, ProviderError> {
        let mut slot = self.session.lock().await;
        let Some(session) = slot.as_ref() else {
            return Ok(None);
        };
        if !session.is_expired(now_epoch_seconds()) {
            return Ok(Some(session.clone()));
        }

        // Expired: try the refresh token once, otherwise the user is signed out.
        let refreshed = match session.refresh_token.as_deref() {
            Some(refresh_token) => self.refresh(refresh_token).await,
            None => Err(ProviderError::Upstream {
                status: 401,
                message: Some("session expired".to_string()),
            }),
        };
        match refreshed {
            Ok(session) => {
                debug!(user_id = %session.user.id, "session refreshed");
                *slot = Some(session.clone());
                Ok(Some(session))
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed; signing out locally");
                *slot = None;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl AuthGateway for SupabaseAuth {
    #[tracing::instrument(name = "auth_sign_in", skip_all)]
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionHandle, ProviderError> {
        let session = self
            .token_grant("password", &PasswordGrant { email, password })
            .await?;
        *self.session.lock().await = Some(session.clone());
        info!(user_id = %session.user.id, "session stored");
        Ok(session)
    }

    #[tracing::instrument(name = "auth_sign_up", skip_all)]
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), ProviderError> {
        let mut url = endpoint(&self.base_url, "auth/v1/signup")?;
        if let Some(redirect_to) = request.redirect_to.as_deref() {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }

        let body = SignUpBody {
            email: &request.email,
            password: &request.password,
            data: SignUpMetadata {
                first_name: &request.first_name,
                last_name: &request.last_name,
                country: &request.country,
            },
        };
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        // The account stays unconfirmed until the email link is followed.
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let Some(session) = self.session.lock().await.take() else {
            return Ok(());
        };

        let url = endpoint(&self.base_url, "auth/v1/logout")?;
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        info!(user_id = %session.user.id, "signed out");
        Ok(())
    }
}
