use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{FunctionReply, SessionHandle, SessionUser};

// Wire DTOs for the hosted auth, table and function endpoints.

#[derive(Debug, Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    // Stored as user metadata by the provider.
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct SignUpMetadata<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub country: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub expires_at: Option<u64>,
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn into_session(self, now_epoch_seconds: u64) -> SessionHandle {
        // Prefer the absolute expiry; fall back to the relative one.
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|ttl| now_epoch_seconds + ttl));
        SessionHandle {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: SessionUser {
                id: self.user.id,
                email: self.user.email,
                metadata: self.user.user_metadata,
            },
        }
    }
}

// Error bodies differ per endpoint; collect the fields any of them may use.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

impl ProviderErrorBody {
    pub fn parse(body: &[u8]) -> Option<String> {
        let parsed: ProviderErrorBody = serde_json::from_slice(body).ok()?;
        parsed.into_message()
    }

    fn into_message(self) -> Option<String> {
        let error = self.error.and_then(|error| match error {
            Value::String(text) => Some(text),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });
        [self.msg, self.message, self.error_description, error]
            .into_iter()
            .flatten()
            .find(|message| !message.trim().is_empty())
    }
}

// Function bodies are `{ ok, error? }`; anything unreadable counts as `ok: false`.
pub fn function_reply(status: u16, body: &[u8]) -> FunctionReply {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    FunctionReply {
        status,
        ok: body.get("ok").and_then(Value::as_bool).unwrap_or(false),
        error: body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
