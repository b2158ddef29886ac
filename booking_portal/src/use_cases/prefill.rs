use tracing::warn;

use crate::domain::{
    BookingDraft, FormField, ProfileRecord, ProfileStore, SessionHandle, SessionProvider,
};

// Contact details gathered from the session and the stored profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefillFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PrefillFields {
    // Only fills blanks; anything the user already typed stays.
    pub fn merge_into(&self, draft: &mut BookingDraft) {
        let pairs = [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Phone, &self.phone),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                draft.fill_blank(field, value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefillOutcome {
    // No session: the dialog must ask the user to log in.
    AuthRequired,
    Ready(PrefillFields),
    // Lookup failed; the form opens with whatever it already has.
    Unavailable,
}

// Best-effort profile hydration with injected dependencies.
pub struct PrefillUseCase<S, P> {
    pub sessions: S,
    pub profiles: P,
}

impl<S, P> PrefillUseCase<S, P>
where
    S: SessionProvider,
    P: ProfileStore,
{
    #[tracing::instrument(name = "prefill", skip_all)]
    pub async fn execute(&self) -> PrefillOutcome {
        let session = match self.sessions.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return PrefillOutcome::AuthRequired,
            Err(err) => {
                warn!(error = %err, "session lookup failed during prefill");
                return PrefillOutcome::Unavailable;
            }
        };

        // A failed profile read still lets the session email through.
        let profile = self
            .profiles
            .fetch_profile(&session.user.id, &session.access_token)
            .await
            .inspect_err(|err| {
                warn!(error = %err, user_id = %session.user.id, "profile lookup failed during prefill");
            })
            .ok()
            .flatten();

        PrefillOutcome::Ready(fields_from(&session, profile.as_ref()))
    }
}

fn fields_from(session: &SessionHandle, profile: Option<&ProfileRecord>) -> PrefillFields {
    PrefillFields {
        name: profile.and_then(|profile| profile.full_name()),
        email: session.user.email.clone(),
        phone: profile.and_then(|profile| profile.phone.clone()),
    }
}
