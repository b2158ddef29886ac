// Client-side routes of the site. Unknown paths fall back to the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Auth,
    Profile,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        // Ignore query strings, fragments and trailing slashes.
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        match path {
            "/auth" => Route::Auth,
            "/profile" => Route::Profile,
            _ => Route::Home,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Auth => "/auth",
            Route::Profile => "/profile",
        }
    }
}
