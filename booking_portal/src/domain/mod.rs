// Domain layer: booking drafts, sessions, listings and the ports they depend on.

pub mod booking;
pub mod catalog;
pub mod errors;
pub mod ports;
pub mod routes;
pub mod session;

pub use booking::{
    BookingDraft, BookingMode, BookingRequest, BookingTarget, FormField, ItineraryPayload,
    SafariMode, ViewingPayload,
};
pub use catalog::{Catalog, ListingType, PropertySummary, SafariSummary};
pub use errors::{AuthFlowError, ProfileError, ProviderError, SubmissionError, ValidationError};
pub use ports::{
    AuthGateway, Clock, FunctionGateway, FunctionReply, Navigator, ProfileStore, SessionProvider,
    SignUpRequest,
};
pub use routes::Route;
pub use session::{Preference, ProfileRecord, SessionHandle, SessionUser};
