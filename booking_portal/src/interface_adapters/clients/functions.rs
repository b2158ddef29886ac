use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::{API_KEY_HEADER, endpoint, transport, with_trailing_slash};
use crate::domain::{FunctionGateway, FunctionReply, ProviderError};
use crate::interface_adapters::protocol::function_reply;

// Thin reqwest client for the serverless functions host.
// No client-level timeout: the caller owns the deadline through the cancel token.
#[derive(Clone)]
pub struct SupabaseFunctions {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseFunctions {
    pub fn new(base_url: Url, anon_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().build()?,
            base_url: with_trailing_slash(base_url),
            anon_key: anon_key.into(),
        })
    }

    async fn call(
        &self,
        url: Url,
        access_token: &str,
        payload: &Value,
    ) -> Result<FunctionReply, ProviderError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(access_token)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        // Non-2xx bodies still carry `{ ok: false, error }`; classification happens upstream.
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;
        Ok(function_reply(status, &body))
    }
}

#[async_trait]
impl FunctionGateway for SupabaseFunctions {
    #[tracing::instrument(name = "invoke_function", skip_all, fields(endpoint = %endpoint_name))]
    async fn invoke(
        &self,
        endpoint_name: &str,
        access_token: &str,
        payload: Value,
        cancel: CancellationToken,
    ) -> Result<FunctionReply, ProviderError> {
        let url = endpoint(&self.base_url, endpoint_name)?;

        // Dropping the in-flight request future aborts the connection.
        let reply = tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            reply = self.call(url, access_token, &payload) => reply,
        };
        let reply = reply?;
        debug!(status = reply.status, ok = reply.ok, "function replied");
        Ok(reply)
    }
}
