// Framework bootstrap for the portal runtime.

use std::io::{Error, Result};
use std::sync::Arc;

use crate::domain::Catalog;
use crate::frameworks::config::{self, PortalConfig};
use crate::frameworks::console::{self, Console};
use crate::interface_adapters::clients::{SupabaseAuth, SupabaseFunctions, SupabaseRest};
use crate::interface_adapters::navigation::HistoryNavigator;
use crate::interface_adapters::state::{PortalState, SystemClock};

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so they never interleave with console replies.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub fn build_state(config: &PortalConfig) -> Result<PortalState> {
    let auth = SupabaseAuth::new(
        config.supabase_url.clone(),
        config.anon_key.clone(),
        config::PROVIDER_TIMEOUT,
    )
    .map_err(|e| Error::other(format!("failed to initialize auth client: {e}")))?;
    let rest = SupabaseRest::new(
        config.supabase_url.clone(),
        config.anon_key.clone(),
        config::PROVIDER_TIMEOUT,
    )
    .map_err(|e| Error::other(format!("failed to initialize table client: {e}")))?;
    let functions = SupabaseFunctions::new(config.functions_url.clone(), config.anon_key.clone())
        .map_err(|e| Error::other(format!("failed to initialize functions client: {e}")))?;
    tracing::debug!(
        supabase_url = %config.supabase_url,
        functions_url = %config.functions_url,
        submit_timeout_ms = config.submit_timeout.as_millis(),
        "backend clients configured"
    );

    let auth = Arc::new(auth);
    Ok(PortalState {
        auth: auth.clone(),
        sessions: auth,
        profiles: Arc::new(rest),
        functions: Arc::new(functions),
        navigator: Arc::new(HistoryNavigator::default()),
        clock: Arc::new(SystemClock),
        catalog: Arc::new(Catalog::standard()),
        submit_timeout: config.submit_timeout,
        provider_timeout: config::PROVIDER_TIMEOUT,
        auth_redirect_url: config.auth_redirect_url.clone(),
    })
}

pub async fn run() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = PortalConfig::load().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    });
    let config = config.map_err(Error::other)?;
    let state = build_state(&config)?;

    let mut routes = state.navigator.subscribe();
    tokio::spawn(async move {
        while routes.changed().await.is_ok() {
            let route = *routes.borrow_and_update();
            tracing::info!(path = route.path(), "route changed");
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console::run(Console::new(state), stdin, tokio::io::stdout()).await
}
