//! Endpoint and page classification.
//!
//! The allow-lists are plain data consumed by pure functions; nothing here
//! is persisted or stateful. Classification is string-prefix matching on
//! the request path (or page route) exactly as issued by the caller.

/// Authentication-flow endpoints.
///
/// A 401 from these is a credential rejection, not an expired session, and
/// must reach the caller untouched so login forms can show precise
/// messages.
pub const AUTH_FLOW_ENDPOINTS: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
];

/// Endpoints where a 401 is an expected absence of a session.
///
/// Used for optional-auth reads: the auth check and public job listings.
pub const PUBLIC_ENDPOINTS: &[&str] = &["/api/auth/me", "/api/v2/jobs", "/api/public/"];

/// Page routes on which a 401 never invalidates the session, regardless
/// of endpoint. `/` is matched exactly, the rest by prefix.
pub const PUBLIC_PAGES: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/jobs",
];

/// Endpoints always resolved against the application origin, bypassing
/// any configured API base URL.
pub const SAME_ORIGIN_ENDPOINTS: &[&str] = &["/api/auth/register", "/api/auth/forgot-password"];

/// How a 401 on this endpoint should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Login/register/password-reset flow; 401 passes through untouched.
    AuthFlow,
    /// Optional-auth endpoint; 401 is an expected absence of a session.
    Public,
    /// Everything else; 401 invalidates the session unless the current
    /// page is public.
    Protected,
}

/// Check whether `path` is an absolute URL used verbatim by the gateway.
pub fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Check whether `path` belongs to the authentication flow.
pub fn is_auth_flow(path: &str) -> bool {
    AUTH_FLOW_ENDPOINTS.iter().any(|p| path.starts_with(p))
}

/// Check whether `path` is exempt from session invalidation on 401.
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|p| path.starts_with(p))
}

/// Check whether the page route is public.
pub fn is_public_page(page: &str) -> bool {
    if page == "/" {
        return true;
    }
    PUBLIC_PAGES.iter().any(|p| page.starts_with(p))
}

/// Check whether `path` must bypass the configured API base URL.
pub fn is_same_origin(path: &str) -> bool {
    SAME_ORIGIN_ENDPOINTS.iter().any(|p| path.starts_with(p))
}

/// Classify a request path for 401 handling.
///
/// Auth-flow endpoints take precedence: `/api/auth/login` is auth-flow
/// even though `/api/auth/me` is public.
pub fn classify(path: &str) -> EndpointClass {
    if is_auth_flow(path) {
        EndpointClass::AuthFlow
    } else if is_public_endpoint(path) {
        EndpointClass::Public
    } else {
        EndpointClass::Protected
    }
}
