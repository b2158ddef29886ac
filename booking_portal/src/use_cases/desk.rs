use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    BookingDraft, BookingMode, BookingTarget, Clock, FormField, FunctionGateway, Navigator,
    ProfileStore, PropertySummary, SafariSummary, SessionProvider,
};
use crate::use_cases::dialog::{BookingDialog, DialogState, RequestKind, SafariKind, ViewingKind};
use crate::use_cases::prefill::PrefillUseCase;
use crate::use_cases::submission::SubmissionOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveDialog {
    Viewing,
    Safari,
}

// Read-only snapshot of whichever dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogView<'a> {
    pub dialog: ActiveDialog,
    pub mode: BookingMode,
    pub state: DialogState,
    pub target: &'a BookingTarget,
    pub draft: &'a BookingDraft,
    pub error: Option<&'a str>,
    pub success: Option<&'a str>,
}

impl<'a> DialogView<'a> {
    fn of<K: RequestKind>(dialog: ActiveDialog, inner: &'a BookingDialog<K>) -> Self {
        Self {
            dialog,
            mode: inner.kind().mode(),
            state: inner.state(),
            target: inner.target(),
            draft: inner.draft(),
            error: inner.error(),
            success: inner.success_message(),
        }
    }
}

// Collaborators shared by both dialogs.
#[derive(Clone)]
pub struct DeskPorts {
    pub sessions: Arc<dyn SessionProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub functions: Arc<dyn FunctionGateway>,
    pub navigator: Arc<dyn Navigator>,
    pub clock: Arc<dyn Clock>,
    pub submit_timeout: Duration,
}

// Owns the viewing and safari dialogs and the triggers that open them.
// At most one dialog is open at a time.
pub struct BookingDesk {
    viewing: BookingDialog<ViewingKind>,
    safari: BookingDialog<SafariKind>,
    prefill: PrefillUseCase<Arc<dyn SessionProvider>, Arc<dyn ProfileStore>>,
    submission: SubmissionOrchestrator<Arc<dyn SessionProvider>, Arc<dyn FunctionGateway>>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
}

impl BookingDesk {
    pub fn new(ports: DeskPorts) -> Self {
        Self {
            viewing: BookingDialog::new(ViewingKind),
            safari: BookingDialog::new(SafariKind::book()),
            prefill: PrefillUseCase {
                sessions: ports.sessions.clone(),
                profiles: ports.profiles,
            },
            submission: SubmissionOrchestrator {
                sessions: ports.sessions,
                gateway: ports.functions,
                timeout: ports.submit_timeout,
            },
            navigator: ports.navigator,
            clock: ports.clock,
        }
    }

    pub fn viewing(&self) -> &BookingDialog<ViewingKind> {
        &self.viewing
    }

    pub fn safari(&self) -> &BookingDialog<SafariKind> {
        &self.safari
    }

    pub fn active(&self) -> Option<ActiveDialog> {
        if self.viewing.is_open() {
            Some(ActiveDialog::Viewing)
        } else if self.safari.is_open() {
            Some(ActiveDialog::Safari)
        } else {
            None
        }
    }

    pub fn view(&self) -> Option<DialogView<'_>> {
        match self.active()? {
            ActiveDialog::Viewing => Some(DialogView::of(ActiveDialog::Viewing, &self.viewing)),
            ActiveDialog::Safari => Some(DialogView::of(ActiveDialog::Safari, &self.safari)),
        }
    }

    #[tracing::instrument(name = "open_viewing", skip_all, fields(property_id = ?property.map(|p| p.id)))]
    pub async fn open_viewing(&mut self, property: Option<&PropertySummary>) {
        let target = property.map(PropertySummary::target).unwrap_or_default();
        if self.viewing.is_open() {
            self.viewing.retarget(ViewingKind, target);
            return;
        }
        self.safari.close();
        self.viewing.open(ViewingKind, target);
        self.viewing.prefill(&self.prefill).await;
    }

    pub async fn open_safari_booking(&mut self, safari: Option<&SafariSummary>) {
        let target = safari.map(SafariSummary::target).unwrap_or_default();
        self.open_safari(SafariKind::book(), target).await;
    }

    pub async fn open_custom_itinerary(&mut self) {
        self.open_safari(SafariKind::custom(), BookingTarget::general())
            .await;
    }

    #[tracing::instrument(name = "open_safari", skip_all, fields(mode = ?kind.mode, safari_id = ?target.id))]
    async fn open_safari(&mut self, kind: SafariKind, target: BookingTarget) {
        if self.safari.is_open() {
            self.safari.retarget(kind, target);
            return;
        }
        self.viewing.close();
        self.safari.open(kind, target);
        self.safari.prefill(&self.prefill).await;
    }

    pub fn close(&mut self) {
        self.viewing.close();
        self.safari.close();
    }

    pub fn edit(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.active() {
            Some(ActiveDialog::Viewing) => self.viewing.edit(field, value),
            Some(ActiveDialog::Safari) => self.safari.edit(field, value),
            None => false,
        }
    }

    pub async fn submit(&mut self) {
        match self.active() {
            Some(ActiveDialog::Viewing) => self.viewing.submit(&self.submission, &self.clock).await,
            Some(ActiveDialog::Safari) => self.safari.submit(&self.submission, &self.clock).await,
            None => {}
        }
    }

    pub fn go_to_login(&self) -> bool {
        match self.active() {
            Some(ActiveDialog::Viewing) => self.viewing.go_to_login(&self.navigator),
            Some(ActiveDialog::Safari) => self.safari.go_to_login(&self.navigator),
            None => false,
        }
    }

    pub fn view_profile(&self) -> bool {
        match self.active() {
            Some(ActiveDialog::Viewing) => self.viewing.view_profile(&self.navigator),
            Some(ActiveDialog::Safari) => self.safari.view_profile(&self.navigator),
            None => false,
        }
    }
}
