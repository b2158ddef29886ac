// The clients defined here are reqwest clients for the hosted backend
// (auth, profile table and serverless functions).

pub mod auth;
pub mod functions;
pub mod rest;

pub use auth::SupabaseAuth;
pub use functions::SupabaseFunctions;
pub use rest::SupabaseRest;

use reqwest::Response;
use url::Url;

use crate::domain::ProviderError;
use crate::interface_adapters::protocol::ProviderErrorBody;

// Header carrying the project's public key on every request.
const API_KEY_HEADER: &str = "apikey";

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

fn decode(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Decode(err.to_string())
}

fn endpoint(base_url: &Url, path: &str) -> Result<Url, ProviderError> {
    base_url
        .join(path)
        .map_err(|err| ProviderError::Transport(format!("invalid endpoint {path}: {err}")))
}

// `Url::join` replaces the last segment unless the base ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// Keep upstream status/message so callers can show the provider's wording.
async fn upstream_error(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| ProviderErrorBody::parse(&body));
    ProviderError::Upstream { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_base_has_path_then_join_keeps_it() {
        let base = with_trailing_slash(
            Url::parse("http://127.0.0.1:9000/functions/v1").expect("valid url"),
        );

        let url = endpoint(&base, "request-viewing").expect("joins");

        assert_eq!(url.as_str(), "http://127.0.0.1:9000/functions/v1/request-viewing");
    }

    #[test]
    fn when_base_is_bare_host_then_join_appends_function_name() {
        let base = with_trailing_slash(
            Url::parse("https://demo.functions.supabase.co").expect("valid url"),
        );

        let url = endpoint(&base, "request-itinerary").expect("joins");

        assert_eq!(url.as_str(), "https://demo.functions.supabase.co/request-itinerary");
    }
}
