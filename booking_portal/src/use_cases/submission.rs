use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::errors::{NETWORK_FALLBACK_MESSAGE, SUBMISSION_FALLBACK_MESSAGE};
use crate::domain::{FunctionGateway, FunctionReply, ProviderError, SessionProvider, SubmissionError};

// Upper bound for a booking function call.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(15_000);

// Sends validated booking payloads to the named functions with a bounded wait.
pub struct SubmissionOrchestrator<S, G> {
    pub sessions: S,
    pub gateway: G,
    pub timeout: Duration,
}

impl<S, G> SubmissionOrchestrator<S, G>
where
    S: SessionProvider,
    G: FunctionGateway,
{
    #[tracing::instrument(name = "submit_booking", skip_all, fields(endpoint = %endpoint))]
    pub async fn submit(&self, endpoint: &str, payload: Value) -> Result<(), SubmissionError> {
        let access_token = match self.sessions.current_session().await {
            Ok(Some(session)) if !session.access_token.is_empty() => session.access_token,
            Ok(_) => return Err(SubmissionError::MissingAuth),
            Err(err) => {
                warn!(error = %err, "session lookup failed before submission");
                return Err(network_error(&err));
            }
        };

        let cancel = CancellationToken::new();
        let call = self
            .gateway
            .invoke(endpoint, &access_token, payload, cancel.clone());

        // Whichever finishes first wins; dropping the call aborts the request.
        let reply = tokio::select! {
            reply = call => reply,
            _ = tokio::time::sleep(self.timeout) => {
                cancel.cancel();
                warn!(timeout_ms = self.timeout.as_millis(), "booking submission timed out");
                return Err(SubmissionError::Timeout);
            }
        };

        classify(reply)
    }
}

fn classify(reply: Result<FunctionReply, ProviderError>) -> Result<(), SubmissionError> {
    match reply {
        Ok(reply) if reply.is_success() => {
            info!(status = reply.status, "booking submission accepted");
            Ok(())
        }
        Ok(reply) => {
            warn!(status = reply.status, error = ?reply.error, "booking submission rejected");
            let message = reply
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| SUBMISSION_FALLBACK_MESSAGE.to_string());
            Err(SubmissionError::ServerRejected(message))
        }
        Err(ProviderError::Cancelled) => Err(SubmissionError::Timeout),
        Err(err) => {
            warn!(error = %err, "booking submission failed in transport");
            Err(network_error(&err))
        }
    }
}

fn network_error(err: &ProviderError) -> SubmissionError {
    let message = err.user_message().unwrap_or(NETWORK_FALLBACK_MESSAGE);
    SubmissionError::Network(message.to_string())
}
