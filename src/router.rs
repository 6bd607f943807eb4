// Client-side route table and navigation
//
// Maps application paths to views with their authorization metadata. Guard
// enforcement belongs to the caller; this module only answers "what is at
// this path and who may see it".

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::auth::UserRole;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

const MAX_REDIRECTS: usize = 8;

/// Page views the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Signup,
    Inventory,
    Cart,
    Orders,
    OrderDetail,
    Settlements,
    MyPage,
    UserDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Pattern, `:name` segments capture a parameter
    pub path: &'static str,
    pub name: &'static str,
    /// `None` for pure redirect entries
    pub view: Option<View>,
    pub redirect: Option<&'static str>,
    pub requires_auth: bool,
    /// Empty means any authenticated role
    pub roles: &'static [UserRole],
}

impl Route {
    const fn public(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view: Some(view),
            redirect: None,
            requires_auth: false,
            roles: &[],
        }
    }

    const fn protected(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view: Some(view),
            redirect: None,
            requires_auth: true,
            roles: &[],
        }
    }

    const fn redirect(path: &'static str, name: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name,
            view: None,
            redirect: Some(to),
            requires_auth: false,
            roles: &[],
        }
    }

    fn with_roles(mut self, roles: &'static [UserRole]) -> Self {
        self.roles = roles;
        self
    }

    /// Match `path` against this route's pattern, capturing parameters
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = split_segments(self.path);
        let actual: Vec<&str> = split_segments(path);
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                if got.is_empty() {
                    return None;
                }
                params.insert(name.to_string(), got.to_string());
            } else if expected != got {
                return None;
            }
        }
        Some(params)
    }
}

static STANDARD_ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    vec![
        Route::redirect("/", "home", "/inventory"),
        Route::public(LOGIN_PATH, "login", View::Login),
        Route::public("/signup", "signup", View::Signup),
        Route::protected("/inventory", "inventory", View::Inventory),
        Route::protected("/cart", "cart", View::Cart),
        Route::protected("/orders", "orders", View::Orders),
        Route::protected("/orders/:orderId", "order-detail", View::OrderDetail),
        Route::protected("/settlements", "settlements", View::Settlements),
        Route::protected("/mypage", "mypage", View::MyPage),
        Route::protected("/users/:loginId", "user-detail", View::UserDetail)
            .with_roles(&[UserRole::Hq]),
    ]
});

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Too many redirects while resolving {0}")]
    RedirectLoop(String),
}

/// A path resolved to its final route
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub route: Route,
    /// Path after following redirects
    pub path: String,
    pub params: HashMap<String, String>,
}

/// Route table
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The application's route table
    pub fn standard() -> Self {
        Self::new(STANDARD_ROUTES.clone())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a path (query and fragment ignored), following redirects
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let mut current = normalize_path(path);

        for _ in 0..=MAX_REDIRECTS {
            let (route, params) = self
                .routes
                .iter()
                .find_map(|r| r.matches(&current).map(|p| (r, p)))
                .ok_or_else(|| RouteError::NotFound(current.clone()))?;

            match route.redirect {
                Some(target) => {
                    tracing::trace!(from = %current, to = target, "Following route redirect");
                    current = normalize_path(target);
                }
                None => {
                    return Ok(ResolvedRoute {
                        route: route.clone(),
                        path: current,
                        params,
                    })
                }
            }
        }

        Err(RouteError::RedirectLoop(path.to_string()))
    }

    /// Whether a user with `role` (None when logged out) may see `route`
    pub fn is_authorized(route: &Route, role: Option<UserRole>) -> bool {
        if !route.requires_auth {
            return true;
        }
        match role {
            None => false,
            Some(role) => route.roles.is_empty() || route.roles.contains(&role),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_path(path: &str) -> String {
    let without_query = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

// ==================================================================================================
// Navigation
// ==================================================================================================

/// The presentation side the session layer talks to when a session ends
pub trait Navigator: Send + Sync {
    /// Current location path
    fn current_path(&self) -> String;

    /// Move to `path`
    fn navigate(&self, path: &str);

    /// Show a blocking notice to the user
    fn notify(&self, message: &str);
}

/// Navigator backed by the route table; keeps the current location and the
/// notices shown so far.
pub struct RouterNavigator {
    router: Router,
    location: RwLock<String>,
    notices: RwLock<Vec<String>>,
}

impl RouterNavigator {
    pub fn new(router: Router, initial_path: &str) -> Self {
        Self {
            router,
            location: RwLock::new(normalize_path(initial_path)),
            notices: RwLock::new(Vec::new()),
        }
    }

    /// Resolve and move to `path`, returning the route now displayed
    pub fn go(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let resolved = self.router.resolve(path)?;
        *self.location.write() = resolved.path.clone();
        tracing::debug!(path = %resolved.path, route = resolved.route.name, "Navigated");
        Ok(resolved)
    }

    /// Notices shown so far, oldest first
    pub fn notices(&self) -> Vec<String> {
        self.notices.read().clone()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Navigator for RouterNavigator {
    fn current_path(&self) -> String {
        self.location.read().clone()
    }

    fn navigate(&self, path: &str) {
        if let Err(e) = self.go(path) {
            tracing::warn!(path = path, error = %e, "Navigation target not in route table");
            *self.location.write() = normalize_path(path);
        }
    }

    fn notify(&self, message: &str) {
        tracing::warn!(notice = message, "User notice");
        self.notices.write().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_redirects_to_inventory() {
        let router = Router::standard();
        let resolved = router.resolve("/").unwrap();
        assert_eq!(resolved.path, "/inventory");
        assert_eq!(resolved.route.view, Some(View::Inventory));
        assert!(resolved.route.requires_auth);
    }

    #[test]
    fn test_param_capture() {
        let router = Router::standard();
        let resolved = router.resolve("/orders/42?tab=items").unwrap();
        assert_eq!(resolved.route.view, Some(View::OrderDetail));
        assert_eq!(resolved.params.get("orderId").map(String::as_str), Some("42"));

        let resolved = router.resolve("/orders/").unwrap();
        assert_eq!(resolved.route.view, Some(View::Orders));
    }

    #[test]
    fn test_unknown_path() {
        let router = Router::standard();
        assert_eq!(
            router.resolve("/nowhere"),
            Err(RouteError::NotFound("/nowhere".to_string()))
        );
    }

    #[test]
    fn test_redirect_loop_detected() {
        let router = Router::new(vec![
            Route::redirect("/a", "a", "/b"),
            Route::redirect("/b", "b", "/a"),
        ]);
        assert!(matches!(router.resolve("/a"), Err(RouteError::RedirectLoop(_))));
    }

    #[test]
    fn test_authorization_metadata() {
        let router = Router::standard();
        let login = router.resolve(LOGIN_PATH).unwrap().route;
        let cart = router.resolve("/cart").unwrap().route;
        let user = router.resolve("/users/store01").unwrap().route;

        assert!(Router::is_authorized(&login, None));
        assert!(!Router::is_authorized(&cart, None));
        assert!(Router::is_authorized(&cart, Some(UserRole::Franchise)));
        assert!(!Router::is_authorized(&user, Some(UserRole::Franchise)));
        assert!(Router::is_authorized(&user, Some(UserRole::Hq)));
    }

    #[test]
    fn test_navigator_tracks_location_and_notices() {
        let nav = RouterNavigator::new(Router::standard(), "/cart");
        assert_eq!(nav.current_path(), "/cart");

        nav.navigate("/");
        assert_eq!(nav.current_path(), "/inventory");

        nav.notify("hello");
        assert_eq!(nav.notices(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_navigator_unknown_target_still_moves() {
        let nav = RouterNavigator::new(Router::standard(), "/inventory");
        nav.navigate("/legacy/page");
        assert_eq!(nav.current_path(), "/legacy/page");
    }

    proptest! {
        #[test]
        fn prop_order_detail_captures_any_segment(id in "[A-Za-z0-9_-]{1,16}") {
            let router = Router::standard();
            let resolved = router.resolve(&format!("/orders/{}", id)).unwrap();
            prop_assert_eq!(resolved.route.view, Some(View::OrderDetail));
            prop_assert_eq!(resolved.params.get("orderId").cloned(), Some(id));
        }
    }
}
