//! Session management for the storefront client.
//!
//! This crate provides:
//! - Token claim decoding and expiry detection
//! - An explicitly constructed session context (identity + raw profile)
//! - FSM-based session state management
//! - A session manager owning the credential pair lifecycle
//!   (login, register, restore, refresh, logout)
//! - The Storefront API REST client

mod api;
mod claims;
mod context;
mod error;
mod manager;
mod notifier;
mod session_fsm;

pub use api::{
    Profile, RegistrationRequest, ResetLink, StorefrontClient, TokenPair, GENERIC_ERROR_DETAIL,
};
pub use claims::{decode_claims, is_expired, TokenClaims};
pub use context::{Identity, SessionContext};
pub use error::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use notifier::{Notifier, NullNotifier, TracingNotifier};
pub use session_fsm::session_machine;
pub use session_fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionState};
