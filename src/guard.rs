//! Navigation gate for unauthenticated sessions.

/// Pages reachable without a session: the auth flow's own entry points.
const OPEN_PATHS: &[&str] = &["/login", "/register", "/verify", "/create-tenant"];

/// What the navigation layer should do with a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// Boolean gate consulted before every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    open_paths: Vec<&'static str>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            open_paths: OPEN_PATHS.to_vec(),
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirect whenever the session is anonymous and the destination is not
    /// one of the flow's entry pages.
    pub fn evaluate(&self, is_authenticated: bool, path: &str) -> GuardDecision {
        if !is_authenticated && !self.open_paths.contains(&path) {
            GuardDecision::RedirectToLogin
        } else {
            GuardDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_navigation_is_redirected() {
        let guard = RouteGuard::new();
        assert_eq!(
            guard.evaluate(false, "/dashboard"),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(guard.evaluate(false, "/"), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn flow_entry_pages_stay_open() {
        let guard = RouteGuard::new();
        for path in ["/login", "/register", "/verify", "/create-tenant"] {
            assert_eq!(guard.evaluate(false, path), GuardDecision::Allow, "{path}");
        }
    }

    #[test]
    fn authenticated_navigation_is_always_allowed() {
        let guard = RouteGuard::new();
        assert_eq!(guard.evaluate(true, "/dashboard"), GuardDecision::Allow);
        assert_eq!(guard.evaluate(true, "/login"), GuardDecision::Allow);
    }
}
