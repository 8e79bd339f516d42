//! Client-side session lifecycle for the LapakBenz supplier client.
//!
//! This crate owns everything the client believes about authentication:
//! the persisted credential, the in-memory session derived from it, the
//! one-shot startup validation, and the route guards that read it. It has no
//! HTTP dependency; the `api` crate plugs in through [`IdentitySource`]
//! and [`Navigator`].

pub mod credential;
pub mod guards;
pub mod init;
pub mod navigation;
pub mod routes;
pub mod state;
pub mod token_store;

pub use credential::{Credential, UserIdentity};
pub use guards::GuardDecision;
pub use init::{IdentitySource, InitOutcome, SessionInitializer};
pub use navigation::{FlowContext, Navigation, Navigator};
pub use routes::{Resolution, Route};
pub use state::{Session, SessionSnapshot};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// View every unauthenticated session is sent to.
pub const LOGIN_PATH: &str = "/login";

/// Default view for an authenticated supplier.
pub const LANDING_PATH: &str = "/dashboard";
