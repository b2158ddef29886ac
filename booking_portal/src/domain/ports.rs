use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::ProviderError;
use crate::domain::session::{ProfileRecord, SessionHandle};

// The use cases depend on these traits, not on the concrete provider clients.
// Dependencies point inwards to the domain layer.

// Source of the current authentication state.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Result<Option<SessionHandle>, ProviderError>;
}

// Keyed access to the `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(
        &self,
        user_id: &Uuid,
        access_token: &str,
    ) -> Result<Option<ProfileRecord>, ProviderError>;

    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError>;
}

// Outcome of a serverless function call as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReply {
    pub status: u16,
    // Explicit `ok` flag of the response body; `false` when absent or unreadable.
    pub ok: bool,
    pub error: Option<String>,
}

impl FunctionReply {
    // Both the transport and the body have to agree.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.ok
    }
}

// Invokes named serverless functions with a bearer token.
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn invoke(
        &self,
        endpoint: &str,
        access_token: &str,
        payload: Value,
        cancel: CancellationToken,
    ) -> Result<FunctionReply, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub redirect_to: Option<String>,
}

// Credential flows of the auth provider.
#[async_trait]
pub trait AuthGateway: SessionProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionHandle, ProviderError>;
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), ProviderError>;
    async fn sign_out(&self) -> Result<(), ProviderError>;
}

// Client-side router: push a path and notify listeners.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

// Port for retrieving the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[async_trait]
impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    async fn current_session(&self) -> Result<Option<SessionHandle>, ProviderError> {
        (**self).current_session().await
    }
}

#[async_trait]
impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    async fn fetch_profile(
        &self,
        user_id: &Uuid,
        access_token: &str,
    ) -> Result<Option<ProfileRecord>, ProviderError> {
        (**self).fetch_profile(user_id, access_token).await
    }

    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        (**self).upsert_profile(access_token, profile).await
    }
}

#[async_trait]
impl<T: FunctionGateway + ?Sized> FunctionGateway for Arc<T> {
    async fn invoke(
        &self,
        endpoint: &str,
        access_token: &str,
        payload: Value,
        cancel: CancellationToken,
    ) -> Result<FunctionReply, ProviderError> {
        (**self).invoke(endpoint, access_token, payload, cancel).await
    }
}

#[async_trait]
impl<T: AuthGateway + ?Sized> AuthGateway for Arc<T> {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionHandle, ProviderError> {
        (**self).sign_in(email, password).await
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<(), ProviderError> {
        (**self).sign_up(request).await
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        (**self).sign_out().await
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
