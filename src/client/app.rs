use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use super::error::ClientError;
use super::http::ApiClient;
use super::notify::Notifier;
use super::screens::{EditorMode, ListScreen, LoginScreen, ProfileScreen, RecordEditor};
use super::session::SessionManager;
use super::storage::KeyValueStore;
use super::theme;
use crate::types::{Theme, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    List,
    Create,
    Edit(u64),
    Profile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::List => "/read".to_string(),
            Route::Create => "/create".to_string(),
            Route::Edit(id) => format!("/update/{}", id),
            Route::Profile => "/profile".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/read" => Some(Route::List),
            "/login" => Some(Route::Login),
            "/create" => Some(Route::Create),
            "/profile" => Some(Route::Profile),
            _ => path
                .strip_prefix("/update/")
                .and_then(|id| id.parse().ok())
                .map(Route::Edit),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Top-level client: owns the session and decides which screen is shown
pub struct App {
    session: SessionManager,
    notifier: Arc<dyn Notifier>,
    location: watch::Sender<String>,
    route: Route,
}

impl App {
    pub fn new(
        base_url: &str,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let (location, receiver) = watch::channel(Route::Login.path());
        let api = ApiClient::new(base_url, storage, receiver)?;

        Ok(Self {
            session: SessionManager::new(api),
            notifier,
            location,
            route: Route::Login,
        })
    }

    /// Validate any stored session, then land on the first screen
    pub async fn start(&mut self) -> Route {
        self.session.restore().await;
        if let Some(error) = self.session.error() {
            self.notifier.warning(error);
        }

        let target = if self.session.is_authenticated() {
            Route::List
        } else {
            Route::Login
        };
        self.navigate(target)
    }

    /// Route guard. Returns the route actually shown.
    pub fn navigate(&mut self, requested: Route) -> Route {
        self.session.process_events();
        let authenticated = self.session.is_authenticated();

        let resolved = match requested {
            Route::Login if authenticated => Route::List,
            route if route.requires_auth() && !authenticated => {
                // An expiry may already have recorded where the user was
                let pending = self.session.pending_redirect().and_then(Route::parse);
                if !pending.is_some_and(|r| r.requires_auth()) {
                    self.session.stash_redirect(&route.path());
                }
                Route::Login
            }
            route => route,
        };

        if resolved != requested {
            tracing::debug!("Navigation to {} redirected to {}", requested, resolved);
        }

        self.route = resolved;
        self.location.send_replace(resolved.path());
        resolved
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    pub fn api(&self) -> ApiClient {
        self.session.api().clone()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    /// Submit the login form and follow it to the next screen
    pub async fn login(&mut self, screen: &mut LoginScreen) -> Route {
        match screen.submit(&mut self.session).await {
            Some(target) => {
                if let Some(user) = self.session.user() {
                    self.notifier.success(&format!("Welcome, {}", user.name));
                }
                self.navigate(target)
            }
            None => self.route,
        }
    }

    pub fn logout(&mut self) -> Route {
        self.session.logout();
        self.notifier.info("Signed out");
        self.navigate(Route::Login)
    }

    /// Pick up a profile saved elsewhere, including its theme
    pub fn profile_saved(&mut self, profile: UserProfile) {
        theme::set_theme(self.storage().as_ref(), profile.preferences.theme);
        self.session.refresh_user(profile);
    }

    pub fn theme(&self) -> Theme {
        theme::current_theme(self.storage().as_ref())
    }

    pub fn set_theme(&self, theme: Theme) -> Theme {
        theme::set_theme(self.storage().as_ref(), theme)
    }

    pub fn toggle_theme(&self) -> Theme {
        theme::toggle_theme(self.storage().as_ref())
    }

    pub fn list_screen(&self) -> ListScreen {
        ListScreen::new(self.api(), self.notifier())
    }

    pub fn editor(&self, mode: EditorMode) -> RecordEditor {
        RecordEditor::new(self.api(), self.notifier(), mode)
    }

    pub fn profile_screen(&self) -> ProfileScreen {
        ProfileScreen::new(self.api(), self.notifier())
    }

    fn storage(&self) -> &Arc<dyn KeyValueStore> {
        self.session.api().storage()
    }
}
