use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{
    AuthGateway, Clock, FunctionGateway, FunctionReply, Navigator, ProfileRecord, ProfileStore,
    ProviderError, SessionHandle, SessionProvider, SessionUser, SignUpRequest,
};

// Shared fixed calendar so date rules are deterministic.
pub(crate) struct FixedClock(pub(crate) NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 15).expect("valid test date")
}

pub(crate) fn tomorrow() -> String {
    (today() + chrono::Days::new(1)).format("%Y-%m-%d").to_string()
}

pub(crate) fn jane_id() -> Uuid {
    Uuid::from_u128(0x1d2c_3b4a_0000_4000_8000_0000_0000_0001)
}

pub(crate) fn jane_session() -> SessionHandle {
    SessionHandle {
        access_token: "jane-token".to_string(),
        refresh_token: Some("jane-refresh".to_string()),
        expires_at: None,
        user: SessionUser {
            id: jane_id(),
            email: Some("jane@example.com".to_string()),
            metadata: json!({ "first_name": "Jane", "last_name": "Doe", "country": "Kenya" }),
        },
    }
}

pub(crate) fn jane_profile() -> ProfileRecord {
    ProfileRecord {
        user_id: Some(jane_id()),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        phone: Some("555".to_string()),
        ..Default::default()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub session: bool,
    pub fetch: bool,
    pub upsert: bool,
    pub sign_in: bool,
    pub sign_up: bool,
}

fn injected(name: &str) -> ProviderError {
    ProviderError::Upstream {
        status: 500,
        message: Some(format!("{name} failed")),
    }
}

// Auth provider fake: holds one session and records credential calls.
#[derive(Clone, Default)]
pub(crate) struct FakeAuth {
    session: Arc<Mutex<Option<SessionHandle>>>,
    // Session handed out by a successful sign-in.
    account: Option<SessionHandle>,
    sign_ups: Arc<Mutex<Vec<SignUpRequest>>>,
    session_calls: Arc<AtomicUsize>,
    failures: FailureFlags,
}

impl FakeAuth {
    pub(crate) fn signed_out() -> Self {
        Self::default()
    }

    pub(crate) fn signed_in(session: SessionHandle) -> Self {
        let fake = Self::default();
        *fake.session.lock().expect("session mutex poisoned") = Some(session);
        fake
    }

    pub(crate) fn with_account(mut self, session: SessionHandle) -> Self {
        self.account = Some(session);
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn current(&self) -> Option<SessionHandle> {
        self.session.lock().expect("session mutex poisoned").clone()
    }

    pub(crate) fn sign_ups(&self) -> Vec<SignUpRequest> {
        self.sign_ups.lock().expect("sign-up mutex poisoned").clone()
    }
}

#[async_trait]
impl SessionProvider for FakeAuth {
    async fn current_session(&self) -> Result<Option<SessionHandle>, ProviderError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.session {
            return Err(injected("session"));
        }
        Ok(self.current())
    }
}

#[async_trait]
impl AuthGateway for FakeAuth {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<SessionHandle, ProviderError> {
        if self.failures.sign_in {
            return Err(ProviderError::Upstream {
                status: 400,
                message: Some("Invalid login credentials".to_string()),
            });
        }
        let session = self.account.clone().ok_or(ProviderError::Upstream {
            status: 400,
            message: None,
        })?;
        *self.session.lock().expect("session mutex poisoned") = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<(), ProviderError> {
        if self.failures.sign_up {
            return Err(injected("sign-up"));
        }
        self.sign_ups
            .lock()
            .expect("sign-up mutex poisoned")
            .push(request);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        *self.session.lock().expect("session mutex poisoned") = None;
        Ok(())
    }
}

// Profile table fake keyed by user id.
#[derive(Clone, Default)]
pub(crate) struct RecordingProfiles {
    rows: Arc<Mutex<HashMap<Uuid, ProfileRecord>>>,
    upserts: Arc<Mutex<Vec<(String, ProfileRecord)>>>,
    fetch_calls: Arc<AtomicUsize>,
    failures: FailureFlags,
}

impl RecordingProfiles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_row(self, user_id: Uuid, profile: ProfileRecord) -> Self {
        self.rows
            .lock()
            .expect("profiles mutex poisoned")
            .insert(user_id, profile);
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn upserts(&self) -> Vec<(String, ProfileRecord)> {
        self.upserts.lock().expect("upserts mutex poisoned").clone()
    }
}

#[async_trait]
impl ProfileStore for RecordingProfiles {
    async fn fetch_profile(
        &self,
        user_id: &Uuid,
        _access_token: &str,
    ) -> Result<Option<ProfileRecord>, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.fetch {
            return Err(injected("fetch"));
        }
        let rows = self.rows.lock().expect("profiles mutex poisoned");
        Ok(rows.get(user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        if self.failures.upsert {
            return Err(injected("upsert"));
        }
        self.upserts
            .lock()
            .expect("upserts mutex poisoned")
            .push((access_token.to_string(), profile.clone()));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub endpoint: String,
    pub access_token: String,
    pub payload: Value,
}

// Function gateway fake returning one scripted outcome, optionally after a delay.
#[derive(Clone)]
pub(crate) struct ScriptedGateway {
    outcome: Result<FunctionReply, ProviderError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    tokens: Arc<Mutex<Vec<CancellationToken>>>,
}

impl ScriptedGateway {
    pub(crate) fn replying(status: u16, ok: bool, error: Option<&str>) -> Self {
        Self::with_outcome(Ok(FunctionReply {
            status,
            ok,
            error: error.map(str::to_string),
        }))
    }

    pub(crate) fn ok() -> Self {
        Self::replying(200, true, None)
    }

    pub(crate) fn failing(err: ProviderError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<FunctionReply, ProviderError>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn last_token_cancelled(&self) -> bool {
        self.tokens
            .lock()
            .expect("tokens mutex poisoned")
            .last()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[async_trait]
impl FunctionGateway for ScriptedGateway {
    async fn invoke(
        &self,
        endpoint: &str,
        access_token: &str,
        payload: Value,
        cancel: CancellationToken,
    ) -> Result<FunctionReply, ProviderError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(RecordedCall {
                endpoint: endpoint.to_string(),
                access_token: access_token.to_string(),
                payload,
            });
        self.tokens
            .lock()
            .expect("tokens mutex poisoned")
            .push(cancel.clone());

        if let Some(delay) = self.delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            }
        }
        self.outcome.clone()
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub(crate) fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("paths mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths
            .lock()
            .expect("paths mutex poisoned")
            .push(path.to_string());
    }
}
