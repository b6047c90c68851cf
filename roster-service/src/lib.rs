// Roster Service Library
// Core state for the roster user manager: collection, search, pagination and the REST gateway

pub mod config;
pub mod gateway;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, LogConfig, RosterConfig};
pub use models::{EchoedUser, Field, NewUser, UserRecord};

// Re-export gateway types
pub use gateway::{
    GatewayError, GatewayOperation, GatewayResult, HttpUserGateway, InMemoryGateway, UserGateway,
};

// Re-export session types
pub use session::{
    Mutation, MutationKind, MutationOutcome, SessionError, SessionPhase, SessionResult,
    SessionState, SessionView, UserSession,
};

pub use store::{StoreError, StoreResult, UserCollection};
pub use validation::{validate, validate_field, FieldErrors};
pub use view::{clamp_page, filter, paginate, total_pages, PageWindow};
