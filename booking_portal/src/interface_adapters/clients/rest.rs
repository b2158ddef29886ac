use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use super::{API_KEY_HEADER, decode, endpoint, transport, upstream_error, with_trailing_slash};
use crate::domain::{ProfileRecord, ProfileStore, ProviderError};

const PROFILES_PATH: &str = "rest/v1/profiles";
// Upsert on the `user_id` conflict target without echoing the row back.
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

// Thin reqwest client for the `profiles` table over the REST gateway.
#[derive(Clone)]
pub struct SupabaseRest {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseRest {
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
        })
    }
}

#[async_trait]
impl ProfileStore for SupabaseRest {
    #[tracing::instrument(name = "fetch_profile", skip_all, fields(user_id = %user_id))]
    async fn fetch_profile(
        &self,
        user_id: &Uuid,
        access_token: &str,
    ) -> Result<Option<ProfileRecord>, ProviderError> {
        let mut url = endpoint(&self.base_url, PROFILES_PATH)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user_id}"));

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        // Filtered selects always come back as an array.
        let rows = response
            .json::<Vec<ProfileRecord>>()
            .await
            .map_err(decode)?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "upsert_profile", skip_all)]
    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        let mut url = endpoint(&self.base_url, PROFILES_PATH)?;
        url.query_pairs_mut().append_pair("on_conflict", "user_id");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .header("Prefer", UPSERT_PREFERENCE)
            .bearer_auth(access_token)
            .json(profile)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        Ok(())
    }
}
