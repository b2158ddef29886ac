use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    BookingDraft, BookingMode, BookingRequest, BookingTarget, Clock, FormField, FunctionGateway,
    ItineraryPayload, Navigator, ProfileStore, Route, SafariMode, SessionProvider,
    SubmissionError, ValidationError, ViewingPayload,
};
use crate::use_cases::prefill::{PrefillOutcome, PrefillUseCase};
use crate::use_cases::submission::SubmissionOrchestrator;
use crate::use_cases::validation::{validate_safari, validate_viewing};

// What a booking dialog collects and where it sends it.
pub trait RequestKind: Clone + Send + Sync {
    type Payload: Serialize;

    fn endpoint(&self) -> &'static str;
    fn mode(&self) -> BookingMode;
    fn validate(
        &self,
        draft: &BookingDraft,
        target: &BookingTarget,
        today: NaiveDate,
    ) -> Result<BookingRequest, ValidationError>;
    fn payload(&self, request: &BookingRequest) -> Self::Payload;
    fn success_message(&self, request: &BookingRequest) -> String;
}

// Property viewing requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewingKind;

impl RequestKind for ViewingKind {
    type Payload = ViewingPayload;

    fn endpoint(&self) -> &'static str {
        "request-viewing"
    }

    fn mode(&self) -> BookingMode {
        BookingMode::Viewing
    }

    fn validate(
        &self,
        draft: &BookingDraft,
        target: &BookingTarget,
        today: NaiveDate,
    ) -> Result<BookingRequest, ValidationError> {
        validate_viewing(draft, target, today)
    }

    fn payload(&self, request: &BookingRequest) -> ViewingPayload {
        ViewingPayload::from(request)
    }

    fn success_message(&self, request: &BookingRequest) -> String {
        format!(
            "Viewing scheduled successfully. We sent a confirmation to {}.",
            request.email
        )
    }
}

// Safari bookings and custom itinerary requests share one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafariKind {
    pub mode: SafariMode,
}

impl SafariKind {
    pub fn book() -> Self {
        Self {
            mode: SafariMode::Book,
        }
    }

    pub fn custom() -> Self {
        Self {
            mode: SafariMode::Custom,
        }
    }
}

impl RequestKind for SafariKind {
    type Payload = ItineraryPayload;

    fn endpoint(&self) -> &'static str {
        "request-itinerary"
    }

    fn mode(&self) -> BookingMode {
        self.mode.booking_mode()
    }

    fn validate(
        &self,
        draft: &BookingDraft,
        target: &BookingTarget,
        today: NaiveDate,
    ) -> Result<BookingRequest, ValidationError> {
        validate_safari(draft, target, self.mode, today)
    }

    fn payload(&self, request: &BookingRequest) -> ItineraryPayload {
        ItineraryPayload {
            safari_id: request.target.id,
            safari_title: request.target.title.clone(),
            mode: self.mode,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            start_date: request.date,
            group_size: request.group_size.unwrap_or(1),
        }
    }

    fn success_message(&self, _request: &BookingRequest) -> String {
        let message = match self.mode {
            SafariMode::Custom => {
                "Custom itinerary request received. Expect a personalized proposal shortly."
            }
            SafariMode::Book => "Safari booking submitted. Our team will confirm your slot via email.",
        };
        message.to_string()
    }
}

// A failed submission is `Form` with `error()` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Prefilling,
    AuthRequired,
    Form,
    Submitting,
    Success,
}

// Proof that prefill was started in a given open cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefillTicket {
    cycle: u64,
}

// A validated submission waiting for the orchestrator.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    cycle: u64,
    pub endpoint: &'static str,
    pub payload: Value,
    success_message: String,
}

// One modal booking dialog. Single owner, driven by UI events.
#[derive(Debug, Clone)]
pub struct BookingDialog<K: RequestKind> {
    kind: K,
    target: BookingTarget,
    draft: BookingDraft,
    state: DialogState,
    error: Option<String>,
    success_message: Option<String>,
    // Set once prefill starts in the current open cycle; cleared on close.
    prefilled: bool,
    // Bumped on every open and close so late results can be recognised.
    cycle: u64,
}

impl<K: RequestKind> BookingDialog<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            target: BookingTarget::general(),
            draft: BookingDraft::default(),
            state: DialogState::Closed,
            error: None,
            success_message: None,
            prefilled: false,
            cycle: 0,
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn target(&self) -> &BookingTarget {
        &self.target
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == DialogState::Submitting
    }

    // Starts a fresh open cycle. All transient state from a previous cycle is dropped.
    pub fn open(&mut self, kind: K, target: BookingTarget) {
        self.reset();
        self.kind = kind;
        self.target = target;
        self.state = DialogState::Prefilling;
        debug!(endpoint = self.kind.endpoint(), "booking dialog opened");
    }

    // Points an open dialog at another listing. Keeps the draft and the latch.
    pub fn retarget(&mut self, kind: K, target: BookingTarget) {
        if !self.is_open() {
            return;
        }
        self.kind = kind;
        self.target = target;
        self.error = None;
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!(endpoint = self.kind.endpoint(), "booking dialog closed");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.cycle += 1;
        self.target = BookingTarget::general();
        self.draft = BookingDraft::default();
        self.state = DialogState::Closed;
        self.error = None;
        self.success_message = None;
        self.prefilled = false;
    }

    // Called on every render; hands out a ticket only the first time per open cycle.
    pub fn begin_prefill(&mut self) -> Option<PrefillTicket> {
        if self.state != DialogState::Prefilling || self.prefilled {
            return None;
        }
        self.prefilled = true;
        Some(PrefillTicket { cycle: self.cycle })
    }

    // Applies a prefill result. Results from a closed or superseded cycle are dropped.
    pub fn apply_prefill(&mut self, ticket: PrefillTicket, outcome: PrefillOutcome) -> bool {
        if ticket.cycle != self.cycle || self.state != DialogState::Prefilling {
            debug!("discarding stale prefill result");
            return false;
        }
        match outcome {
            PrefillOutcome::AuthRequired => self.state = DialogState::AuthRequired,
            PrefillOutcome::Ready(fields) => {
                fields.merge_into(&mut self.draft);
                self.state = DialogState::Form;
            }
            PrefillOutcome::Unavailable => self.state = DialogState::Form,
        }
        true
    }

    // Edits are only accepted while the form is shown.
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) -> bool {
        if self.state != DialogState::Form {
            return false;
        }
        self.draft.set(field, value);
        true
    }

    // Validates and enters `Submitting`. A no-op outside `Form`, which also
    // makes repeated clicks while a submission is in flight harmless.
    pub fn begin_submit(&mut self, today: NaiveDate) -> Option<SubmitTicket> {
        if self.state != DialogState::Form {
            return None;
        }

        let request = match self.kind.validate(&self.draft, &self.target, today) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };

        let payload = match serde_json::to_value(self.kind.payload(&request)) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to encode booking payload");
                self.error = Some(err.to_string());
                return None;
            }
        };

        self.error = None;
        self.state = DialogState::Submitting;
        Some(SubmitTicket {
            cycle: self.cycle,
            endpoint: self.kind.endpoint(),
            payload,
            success_message: self.kind.success_message(&request),
        })
    }

    pub fn finish_submit(&mut self, ticket: SubmitTicket, result: Result<(), SubmissionError>) {
        if ticket.cycle != self.cycle || self.state != DialogState::Submitting {
            debug!("discarding stale submission result");
            return;
        }
        match result {
            Ok(()) => {
                self.state = DialogState::Success;
                self.success_message = Some(ticket.success_message);
            }
            Err(err @ SubmissionError::MissingAuth) => {
                self.state = DialogState::AuthRequired;
                self.error = Some(err.to_string());
            }
            Err(err) => {
                self.state = DialogState::Form;
                self.error = Some(err.to_string());
            }
        }
    }

    // Only offered while the dialog asks for a login.
    pub fn go_to_login(&self, navigator: &impl Navigator) -> bool {
        if self.state != DialogState::AuthRequired {
            return false;
        }
        navigator.navigate(Route::Auth.path());
        true
    }

    // Only offered after a successful submission.
    pub fn view_profile(&self, navigator: &impl Navigator) -> bool {
        if self.state != DialogState::Success {
            return false;
        }
        navigator.navigate(Route::Profile.path());
        true
    }

    pub async fn prefill<S, P>(&mut self, use_case: &PrefillUseCase<S, P>)
    where
        S: SessionProvider,
        P: ProfileStore,
    {
        if let Some(ticket) = self.begin_prefill() {
            let outcome = use_case.execute().await;
            self.apply_prefill(ticket, outcome);
        }
    }

    pub async fn submit<S, G>(
        &mut self,
        orchestrator: &SubmissionOrchestrator<S, G>,
        clock: &impl Clock,
    ) where
        S: SessionProvider,
        G: FunctionGateway,
    {
        if let Some(ticket) = self.begin_submit(clock.today()) {
            let result = orchestrator
                .submit(ticket.endpoint, ticket.payload.clone())
                .await;
            self.finish_submit(ticket, result);
        }
    }
}
