//! Per-navigation route guard.
//!
//! Each navigation attempt runs the guard through
//! `Checking -> Decided(Allow | RedirectTo)`. The transition into
//! `Checking` happens when a new navigation begins; the terminal decision
//! is committed only if the navigation that requested it is still the
//! current one, so an in-flight profile fetch that outlives its navigation
//! is discarded instead of applying stale vendor status.

use crate::route::{Route, RouteSection, RouteTable};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use storefront_session::{Profile, SessionContext, SessionResult, StorefrontClient};
use tracing::{debug, warn};

/// Redirect target for unauthenticated navigations.
pub const LOGIN_PATH: &str = "/login";
/// Redirect target for non-vendors entering the vendor section.
pub const ACCOUNT_PATH: &str = "/account";
/// Redirect target for vendors hitting a vendor-only customer route.
pub const ADMIN_PATH: &str = "/admin";

/// Terminal decision for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Allow,
    /// Navigate to the given path instead
    RedirectTo(String),
}

/// Guard state for the current navigation.
///
/// While `Checking`, the caller must not render protected content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Resolution pending (initial, and whenever inputs change)
    Checking,
    /// Resolution complete for this navigation
    Decided(GuardDecision),
}

/// Result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The decision was committed for the current navigation
    Decided(GuardDecision),
    /// A newer navigation superseded this one; nothing was applied
    Superseded,
}

/// Source of profile data for vendor-status resolution.
#[allow(async_fn_in_trait)]
pub trait ProfileSource {
    /// Fetch the profile for a user.
    async fn fetch_profile(&self, user_id: u64) -> SessionResult<Profile>;
}

impl ProfileSource for StorefrontClient {
    async fn fetch_profile(&self, user_id: u64) -> SessionResult<Profile> {
        StorefrontClient::fetch_profile(self, user_id).await
    }
}

/// The route guard, consulted once per navigation attempt.
pub struct RouteGuard {
    table: RouteTable,
    state: Mutex<GuardState>,
    /// Monotonic navigation generation; stale resolutions are discarded.
    generation: AtomicU64,
}

impl RouteGuard {
    /// Create a guard over a declared route table.
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            state: Mutex::new(GuardState::Checking),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the guard state for the current navigation.
    pub fn state(&self) -> GuardState {
        self.state.lock().unwrap().clone()
    }

    /// Begin a new navigation attempt.
    ///
    /// Resets the guard to `Checking` and returns the generation tag that
    /// must accompany the matching `resolve` call. Any resolution carrying
    /// an older tag is discarded when it completes.
    pub fn begin_navigation(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.lock().unwrap() = GuardState::Checking;
        debug!(generation, "Navigation started, guard checking");
        generation
    }

    /// Resolve the decision for a navigation.
    ///
    /// Resolution order:
    /// 1. Not logged in -> redirect to the login page, no profile fetch.
    /// 2. Vendor status: the session's cached profile (`vendor_id > 0`) if
    ///    present, otherwise a fresh profile fetch (`is_vendor`); a fetch
    ///    failure counts as not-vendor rather than blocking navigation.
    /// 3. The section/role rules (see `decide`).
    ///
    /// The guard reports `Checking` until the decision commits.
    pub async fn resolve<S: ProfileSource>(
        &self,
        generation: u64,
        path: &str,
        session: &SessionContext,
        profiles: &S,
    ) -> GuardOutcome {
        if !session.is_logged_in() {
            return self.commit(
                generation,
                GuardDecision::RedirectTo(LOGIN_PATH.to_string()),
            );
        }

        let is_vendor = match session.cached_vendor_id() {
            Some(vendor_id) => vendor_id > 0,
            None => {
                let Some(identity) = session.identity() else {
                    // Logged-in snapshot raced with a logout; treat as
                    // unauthenticated.
                    return self.commit(
                        generation,
                        GuardDecision::RedirectTo(LOGIN_PATH.to_string()),
                    );
                };

                match profiles.fetch_profile(identity.user_id).await {
                    Ok(profile) => {
                        if self.generation.load(Ordering::SeqCst) != generation {
                            debug!(generation, "Profile fetch outlived its navigation, discarding");
                            return GuardOutcome::Superseded;
                        }
                        let is_vendor = profile.is_vendor;
                        session.set_profile(Some(profile.raw));
                        is_vendor
                    }
                    Err(e) => {
                        warn!(error = %e, "Profile fetch failed, treating as not-vendor");
                        false
                    }
                }
            }
        };

        let decision = match self.table.resolve(path) {
            Some(route) => decide(is_vendor, route),
            // Undeclared routes carry no role requirement.
            None => decide(
                is_vendor,
                &Route {
                    path: path.to_string(),
                    section: RouteSection::Customer,
                    requires_vendor: false,
                },
            ),
        };

        self.commit(generation, decision)
    }

    /// Commit a decision if its navigation is still current.
    fn commit(&self, generation: u64, decision: GuardDecision) -> GuardOutcome {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Decision for superseded navigation, discarding");
            return GuardOutcome::Superseded;
        }

        debug!(generation, decision = ?decision, "Guard decided");
        *self.state.lock().unwrap() = GuardState::Decided(decision.clone());
        GuardOutcome::Decided(decision)
    }
}

/// The section/role rules for an authenticated user.
fn decide(is_vendor: bool, route: &Route) -> GuardDecision {
    let in_vendor_section = route.section == RouteSection::Vendor;

    if is_vendor && in_vendor_section {
        GuardDecision::Allow
    } else if !in_vendor_section && !route.requires_vendor {
        GuardDecision::Allow
    } else if !is_vendor && in_vendor_section {
        GuardDecision::RedirectTo(ACCOUNT_PATH.to_string())
    } else if is_vendor && !in_vendor_section && route.requires_vendor {
        GuardDecision::RedirectTo(ADMIN_PATH.to_string())
    } else {
        // No rule matched - keep the permissive default.
        GuardDecision::Allow
    }
}
