// Use cases layer: booking dialogs and the account workflows around them.

pub mod auth_flow;
pub mod desk;
pub mod dialog;
pub mod prefill;
pub mod profile;
pub mod submission;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_flow::{AuthFlow, SignUpForm};
pub use desk::{ActiveDialog, BookingDesk, DeskPorts, DialogView};
pub use dialog::{BookingDialog, DialogState, RequestKind, SafariKind, ViewingKind};
pub use prefill::{PrefillFields, PrefillOutcome, PrefillUseCase};
pub use profile::{ProfileEditor, ProfileField, ProfileForm, ProfileView};
pub use submission::{DEFAULT_SUBMIT_TIMEOUT, SubmissionOrchestrator};
