use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

use crate::domain::{Navigator, Route};

// Client-side history: a stack of visited paths plus a watch channel
// publishing the route listeners should render.
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
    route_tx: watch::Sender<Route>,
}

impl HistoryNavigator {
    pub fn new(initial_path: &str) -> Self {
        let (route_tx, _route_rx) = watch::channel(Route::from_path(initial_path));
        Self {
            history: Mutex::new(vec![initial_path.to_string()]),
            route_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route_tx.subscribe()
    }

    pub fn current(&self) -> Route {
        *self.route_tx.borrow()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Pops the current entry; the first entry is never popped.
    pub fn back(&self) -> Route {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() > 1 {
            history.pop();
        }
        let route = history.last().map_or(Route::Home, |path| Route::from_path(path));
        self.route_tx.send_replace(route);
        route
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::Home.path())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        let route = Route::from_path(path);
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
        tracing::debug!(path, ?route, "navigate");
        self.route_tx.send_replace(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn when_navigating_then_subscribers_see_the_new_route() {
        let navigator = HistoryNavigator::default();
        let mut routes = navigator.subscribe();

        navigator.navigate("/profile");

        routes.changed().await.expect("sender alive");
        assert_eq!(*routes.borrow(), Route::Profile);
        assert_eq!(navigator.history(), vec!["/".to_string(), "/profile".to_string()]);
    }

    #[test]
    fn when_path_is_unknown_then_route_falls_back_to_home() {
        let navigator = HistoryNavigator::new("/auth");

        navigator.navigate("/nowhere");

        assert_eq!(navigator.current(), Route::Home);
    }

    #[test]
    fn when_going_back_then_previous_route_is_restored() {
        let navigator = HistoryNavigator::default();
        navigator.navigate("/auth");
        navigator.navigate("/profile");

        assert_eq!(navigator.back(), Route::Auth);
        assert_eq!(navigator.back(), Route::Home);
        assert_eq!(navigator.back(), Route::Home);
        assert_eq!(navigator.history(), vec!["/".to_string()]);
    }
}
