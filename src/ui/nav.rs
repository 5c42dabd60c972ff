//! Page identity and the navigation menu.
//!
//! The menu is static data compiled into the tab bar at render time.
//! Route policy: signed-out users only reach the public pages and are
//! redirected to the login page otherwise; signed-in users hitting a
//! public-only page are redirected to the dashboard. Signed-in state is
//! simply the presence of a stored token.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Tasks,
    Calendar,
    Analytics,
    Profile,
    Settings,
}

impl Page {
    pub fn id(&self) -> &'static str {
        match self {
            Page::Login => "index",
            Page::Register => "register",
            Page::Dashboard => "dashboard",
            Page::Tasks => "tasks",
            Page::Calendar => "calendar",
            Page::Analytics => "analytics",
            Page::Profile => "profile",
            Page::Settings => "settings",
        }
    }

    /// Resolve a page identifier as it appears in a location string.
    pub fn from_id(id: &str) -> Option<Page> {
        let id = id.trim_end_matches(".html");
        match id {
            "" | "index" => Some(Page::Login),
            "register" => Some(Page::Register),
            // Legacy alias for the tuned dashboard variant
            "dashboard" | "dashboard_optimized" => Some(Page::Dashboard),
            "tasks" => Some(Page::Tasks),
            "calendar" => Some(Page::Calendar),
            "analytics" => Some(Page::Analytics),
            "profile" => Some(Page::Profile),
            "settings" => Some(Page::Settings),
            _ => None,
        }
    }

    /// Public pages are reachable without a token.
    pub fn is_public(&self) -> bool {
        matches!(self, Page::Login | Page::Register)
    }
}

/// A navigation menu entry: destination page and display label.
#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub page: Page,
    pub label: &'static str,
}

const PUBLIC_MENU: &[NavItem] = &[NavItem {
    page: Page::Login,
    label: "Sign in",
}];

const AUTH_MENU: &[NavItem] = &[
    NavItem {
        page: Page::Dashboard,
        label: "Dashboard",
    },
    NavItem {
        page: Page::Tasks,
        label: "Tasks",
    },
    NavItem {
        page: Page::Calendar,
        label: "Calendar",
    },
    NavItem {
        page: Page::Analytics,
        label: "Analytics",
    },
    NavItem {
        page: Page::Profile,
        label: "Profile",
    },
    NavItem {
        page: Page::Settings,
        label: "Settings",
    },
];

pub fn menu(logged_in: bool) -> &'static [NavItem] {
    if logged_in {
        AUTH_MENU
    } else {
        PUBLIC_MENU
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Stay,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Where a navigation attempt actually lands.
pub fn resolve_route(target: Page, logged_in: bool) -> RouteAction {
    if logged_in && target.is_public() {
        RouteAction::RedirectToDashboard
    } else if !logged_in && !target.is_public() {
        RouteAction::RedirectToLogin
    } else {
        RouteAction::Stay
    }
}
