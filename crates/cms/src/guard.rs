//! Route guards and the route table.

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_ROOT: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Only for authenticated sessions, others go to the login page.
    RequireAuthenticated,
    /// Only for anonymous sessions, others go to the admin root.
    RequireAnonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

impl Guard {
    pub fn check(self, session: &Session) -> Access {
        match (self, session.is_authenticated()) {
            (Self::RequireAuthenticated, false) => Access::Redirect(LOGIN_PATH),
            (Self::RequireAnonymous, true) => Access::Redirect(ADMIN_ROOT),
            _ => Access::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Categories,
    Posts,
    Projects,
    Donations,
    Login,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Self::Dashboard,
        Self::Categories,
        Self::Posts,
        Self::Projects,
        Self::Donations,
        Self::Login,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => ADMIN_ROOT,
            Self::Categories => "/categories",
            Self::Posts => "/posts",
            Self::Projects => "/projects",
            Self::Donations => "/donations",
            Self::Login => LOGIN_PATH,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Categories => "Categories",
            Self::Posts => "Posts",
            Self::Projects => "Projects",
            Self::Donations => "Donations",
            Self::Login => "Log in",
        }
    }

    pub fn guard(self) -> Guard {
        match self {
            Self::Login => Guard::RequireAnonymous,
            _ => Guard::RequireAuthenticated,
        }
    }

    /// Routes listed in the admin menu.
    pub fn menu() -> impl Iterator<Item = Route> {
        Self::ALL
            .into_iter()
            .filter(|route| route.guard() == Guard::RequireAuthenticated)
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => ADMIN_ROOT,
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}
