//! Application route table.
//!
//! DESIGN
//! ======
//! Three pages: `/` and `/sign-in` are public, `/user` is protected by the
//! guard. Resolution happens on every navigation and is a pure function of
//! the session snapshot and the requested location.

pub mod guard;


use guard::{GuardDecision, Location, PendingNavigation, SIGN_IN_PATH, guard_session};

use crate::state::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    SignIn,
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    pub access: Access,
}

/// Result of resolving a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render { page: Page, location: Location },
    Redirect { to: Location, pending: PendingNavigation },
    NotFound { location: Location },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                Route { path: "/", page: Page::Home, access: Access::Public },
                Route { path: SIGN_IN_PATH, page: Page::SignIn, access: Access::Public },
                Route { path: guard::DEFAULT_AFTER_LOGIN_PATH, page: Page::User, access: Access::Protected },
            ],
        }
    }
}

impl RouteTable {
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn find(&self, location: &Location) -> Option<&Route> {
        let path = location.normalized_path();
        self.routes.iter().find(|r| r.path == path)
    }

    /// Resolve a raw navigation target against the current session.
    #[must_use]
    pub fn resolve(&self, state: &SessionState, raw: &str) -> Navigation {
        let location = Location::parse(raw);
        let Some(route) = self.find(&location) else {
            return Navigation::NotFound { location };
        };
        if route.access == Access::Public {
            return Navigation::Render { page: route.page, location };
        }
        match guard_session(state, &location) {
            GuardDecision::Admit => Navigation::Render { page: route.page, location },
            GuardDecision::Redirect { to, pending } => {
                tracing::debug!(from = %location.href(), "protected route redirected to sign-in");
                Navigation::Redirect { to, pending }
            }
        }
    }
}
