//! Prelude module for convenient imports.
//!
//! Import everything with:
//!
//! ```rust,ignore
//! use talentgate::prelude::*;
//! ```

// Gateway and configuration
pub use crate::config::GatewayConfig;
pub use crate::gateway::ApiGateway;

// Response envelope
pub use crate::envelope::{ApiErrorDetail, ApiResponse, PageMeta};

// Error handling
pub use crate::errors::{ApiError, ApiErrorKind};
pub use crate::Result;

// Credential storage
pub use crate::credentials::{CredentialStore, InMemoryCredentialStore, SessionTokens};

// Endpoint classification
pub use crate::endpoints::EndpointClass;
