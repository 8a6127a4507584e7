//! Session state machine using rust-fsm.
//!
//! The FSM makes every legal session transition explicit instead of deriving
//! state from whatever happens to be in cookie storage.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │   NotLoggedIn   │ (initial)
//! └────────┬────────┘
//!          │ LoginAttempt / RegisterAttempt / RestoreAttempt
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐    ┌─────────────────┐
//! │   LoggingIn     │ ◄── │   Registering   │    │    Restoring    │
//! └────────┬────────┘     └─────────────────┘    └────────┬────────┘
//!          │ LoginSuccess      RegisterAccepted           │
//!          │                                              │ StoredTokenExpired
//!          ▼                                              ▼
//! ┌─────────────────┐      AccessTokenExpired    ┌─────────────────┐
//! │    LoggedIn     │ ─────────────────────────► │   Refreshing    │
//! └────────┬────────┘ ◄───────────────────────── └─────────────────┘
//!          │ LogoutRequested    RefreshSuccess
//!          ▼
//! ┌─────────────────┐
//! │   LoggingOut    │ ── LogoutComplete ──► NotLoggedIn
//! └─────────────────┘
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(NotLoggedIn)

    NotLoggedIn => {
        LoginAttempt => LoggingIn,
        RegisterAttempt => Registering,
        RestoreAttempt => Restoring,
        // Cold refresh: a stored refresh token exists but no session yet
        AccessTokenExpired => Refreshing
    },
    Registering => {
        // Account created - chain straight into login with the same credentials
        RegisterAccepted => LoggingIn,
        RegisterFailed => NotLoggedIn
    },
    LoggingIn => {
        LoginSuccess => LoggedIn,
        LoginFailed => NotLoggedIn,
        // A failed re-login leaves the existing session in place
        ReloginFailed => LoggedIn
    },
    Restoring => {
        // One or both cookies absent - session stays empty
        NoStoredTokens => NotLoggedIn,
        // Access token expired per its exp claim - refresh first
        StoredTokenExpired => Refreshing,
        // Stored pair adopted directly as the active session
        StoredTokensAdopted => LoggedIn
    },
    Refreshing => {
        RefreshSuccess => LoggedIn,
        RefreshFailed => NotLoggedIn
    },
    LoggedIn => {
        // A fresh login supersedes the current pair
        LoginAttempt => LoggingIn,
        AccessTokenExpired => Refreshing,
        LogoutRequested => LoggingOut
    },
    LoggingOut => {
        LogoutComplete => NotLoggedIn
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// User-friendly session state for external consumption.
///
/// This is a simplified view of the FSM state for UI purposes; transient
/// states are exactly the ones during which the UI shows a pending
/// indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not logged in.
    NotLoggedIn,
    /// Registration request in flight.
    Registering,
    /// Login request in flight.
    LoggingIn,
    /// Reading stored cookies back into a session.
    Restoring,
    /// Exchanging the refresh token for a new pair.
    Refreshing,
    /// Logged in with an adopted credential pair.
    LoggedIn,
    /// Currently logging out.
    LoggingOut,
}

impl SessionState {
    /// Returns true if the user has an active session (LoggedIn state only).
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::LoggedIn)
    }

    /// Returns true if the state is a transient/in-progress state.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SessionState::Registering
                | SessionState::LoggingIn
                | SessionState::Restoring
                | SessionState::Refreshing
                | SessionState::LoggingOut
        )
    }
}

impl From<&SessionMachineState> for SessionState {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::NotLoggedIn => SessionState::NotLoggedIn,
            SessionMachineState::Registering => SessionState::Registering,
            SessionMachineState::LoggingIn => SessionState::LoggingIn,
            SessionMachineState::Restoring => SessionState::Restoring,
            SessionMachineState::Refreshing => SessionState::Refreshing,
            SessionMachineState::LoggedIn => SessionState::LoggedIn,
            SessionMachineState::LoggingOut => SessionState::LoggingOut,
        }
    }
}
