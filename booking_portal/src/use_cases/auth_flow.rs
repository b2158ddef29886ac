use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{
    AuthFlowError, AuthGateway, FunctionGateway, Navigator, Route, SessionHandle, SignUpRequest,
};

pub const SIGN_UP_MESSAGE: &str = "Check your email to confirm your account";
pub const SIGN_IN_MESSAGE: &str = "Logged in";

const PROFILE_SYNC_ENDPOINT: &str = "upsert-profile";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
}

// Login/sign-up surface with injected dependencies.
pub struct AuthFlow<A, G, N> {
    pub auth: A,
    pub functions: G,
    pub navigator: N,
    // Where the confirmation email sends the user back to.
    pub redirect_to: Option<String>,
    // Upper bound on the post-login profile sync.
    pub sync_timeout: Duration,
}

impl<A, G, N> AuthFlow<A, G, N>
where
    A: AuthGateway,
    G: FunctionGateway,
    N: Navigator,
{
    #[tracing::instrument(name = "sign_up", skip_all)]
    pub async fn sign_up(&self, form: SignUpForm) -> Result<&'static str, AuthFlowError> {
        if [&form.first_name, &form.last_name, &form.country]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(AuthFlowError::MissingSignUpFields);
        }

        self.auth
            .sign_up(SignUpRequest {
                email: form.email.trim().to_string(),
                password: form.password,
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                country: form.country.trim().to_string(),
                redirect_to: self.redirect_to.clone(),
            })
            .await?;

        info!("sign-up accepted, awaiting email confirmation");
        Ok(SIGN_UP_MESSAGE)
    }

    #[tracing::instrument(name = "sign_in", skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<&'static str, AuthFlowError> {
        let session = self.auth.sign_in(email.trim(), password).await?;
        info!(user_id = %session.user.id, "signed in");

        self.sync_profile(&session).await;
        self.navigator.navigate(Route::Profile.path());
        Ok(SIGN_IN_MESSAGE)
    }

    // Visiting the auth surface with a live session skips straight to the profile.
    pub async fn resume(&self) -> bool {
        match self.auth.current_session().await {
            Ok(Some(session)) => {
                self.sync_profile(&session).await;
                self.navigator.navigate(Route::Profile.path());
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "session lookup failed on auth surface");
                false
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthFlowError> {
        let result = self.auth.sign_out().await;
        // The local session is gone either way.
        self.navigator.navigate(Route::Home.path());
        result.map_err(AuthFlowError::from)
    }

    // Best-effort: copy sign-up metadata into the profile row.
    async fn sync_profile(&self, session: &SessionHandle) {
        let user = &session.user;
        let first_name = user.metadata_str("first_name");
        let last_name = user.metadata_str("last_name");
        let country = user.metadata_str("country");
        if first_name.is_none() && last_name.is_none() && country.is_none() {
            return;
        }

        let payload = json!({
            "first_name": first_name,
            "last_name": last_name,
            "location": null,
            "preference": null,
            "about": null,
        });
        let cancel = CancellationToken::new();
        let call = self.functions.invoke(
            PROFILE_SYNC_ENDPOINT,
            &session.access_token,
            payload,
            cancel.clone(),
        );
        let result = tokio::select! {
            result = call => result,
            _ = tokio::time::sleep(self.sync_timeout) => {
                cancel.cancel();
                warn!(timeout_ms = self.sync_timeout.as_millis(), "profile sync timed out");
                return;
            }
        };

        match result {
            Ok(reply) if reply.is_success() => info!(user_id = %user.id, "profile synced"),
            Ok(reply) => {
                warn!(status = reply.status, error = ?reply.error, "profile sync rejected")
            }
            Err(err) => warn!(error = %err, "profile sync failed"),
        }
    }
}
