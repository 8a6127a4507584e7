//! Route guarding for the storefront client.
//!
//! This crate provides:
//! - A route table with per-route declared sections (customer vs vendor),
//!   replacing URL substring matching
//! - The per-navigation guard state machine
//!   (`Checking -> Decided(Allow | RedirectTo)`)
//! - Vendor-status resolution with navigation-generation tagging so a stale
//!   in-flight profile fetch can never apply an outdated decision

mod guard;
mod route;

pub use guard::{
    GuardDecision, GuardOutcome, GuardState, ProfileSource, RouteGuard, ACCOUNT_PATH, ADMIN_PATH,
    LOGIN_PATH,
};
pub use route::{Route, RouteSection, RouteTable};
