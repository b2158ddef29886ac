use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::{AuthGateway, Catalog, Clock, FunctionGateway, ProfileStore, SessionProvider};
use crate::interface_adapters::navigation::HistoryNavigator;
use crate::use_cases::{AuthFlow, BookingDesk, DeskPorts, ProfileEditor};

// Local calendar date of the machine running the portal.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub type PortalAuthFlow =
    AuthFlow<Arc<dyn AuthGateway>, Arc<dyn FunctionGateway>, Arc<HistoryNavigator>>;
pub type PortalProfileEditor = ProfileEditor<Arc<dyn SessionProvider>, Arc<dyn ProfileStore>>;

#[derive(Clone)]
pub struct PortalState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    // `auth` and `sessions` point at the same client.
    pub auth: Arc<dyn AuthGateway>,
    pub sessions: Arc<dyn SessionProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub functions: Arc<dyn FunctionGateway>,
    pub navigator: Arc<HistoryNavigator>,
    pub clock: Arc<dyn Clock>,
    pub catalog: Arc<Catalog>,
    pub submit_timeout: Duration,
    // Bound for best-effort provider calls made outside a booking submission.
    pub provider_timeout: Duration,
    pub auth_redirect_url: Option<String>,
}

impl PortalState {
    pub fn booking_desk(&self) -> BookingDesk {
        BookingDesk::new(DeskPorts {
            sessions: self.sessions.clone(),
            profiles: self.profiles.clone(),
            functions: self.functions.clone(),
            navigator: self.navigator.clone(),
            clock: self.clock.clone(),
            submit_timeout: self.submit_timeout,
        })
    }

    pub fn auth_flow(&self) -> PortalAuthFlow {
        AuthFlow {
            auth: self.auth.clone(),
            functions: self.functions.clone(),
            navigator: self.navigator.clone(),
            redirect_to: self.auth_redirect_url.clone(),
            sync_timeout: self.provider_timeout,
        }
    }

    pub fn profile_editor(&self) -> PortalProfileEditor {
        ProfileEditor {
            sessions: self.sessions.clone(),
            profiles: self.profiles.clone(),
        }
    }
}
