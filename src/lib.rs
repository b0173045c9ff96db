//! Talentgate API gateway client.
//!
//! The single funnel through which a Talentgate host issues HTTP calls,
//! so that authentication, error interpretation, and session-expiry
//! behavior are applied consistently:
//!
//! - **URL construction**: relative paths are resolved against a
//!   configurable API base, with a fixed allow-list of paths (registration,
//!   password reset) always forced to the application origin.
//! - **Header composition**: a bearer token from the injected credential
//!   store, cookies via the client's jar, and `Content-Type:
//!   application/json` on every verb except GET/HEAD.
//! - **Error interpretation**: every failure surfaces as one typed
//!   [`ApiError`] carrying the HTTP status, envelope error code, and
//!   offending field; status `0` means the request never completed.
//! - **401 policy**: auth-flow endpoints and public endpoints/pages pass
//!   the error through untouched; everywhere else the stored token is
//!   cleared and the injected session-expired callback runs.
//!
//! # Example
//!
//! ```ignore
//! use talentgate::prelude::*;
//!
//! let config = GatewayConfig::new("https://app.talentgate.io")
//!     .with_api_base_url("https://api.talentgate.io");
//! let gateway = ApiGateway::new(config, InMemoryCredentialStore::new())?
//!     .with_session_expired(|| redirect_to_login());
//!
//! let jobs: ApiResponse<Vec<Job>> = gateway
//!     .get("/api/v2/jobs", Some(&[("page", "1"), ("limit", "20")]))
//!     .await?;
//! ```

pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod envelope;
pub mod errors;
pub mod gateway;
pub mod prelude;

pub use config::GatewayConfig;
pub use credentials::{CredentialStore, InMemoryCredentialStore, SessionTokens};
pub use envelope::{ApiErrorDetail, ApiResponse, PageMeta};
pub use errors::{ApiError, ApiErrorKind};
pub use gateway::ApiGateway;

/// Common result alias for gateway operations.
pub type Result<T> = std::result::Result<T, ApiError>;
