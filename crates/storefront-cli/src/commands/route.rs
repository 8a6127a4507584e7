//! Route guard inspection.

use super::build_manager;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use storefront_guard::{GuardDecision, GuardOutcome, RouteGuard, RouteSection, RouteTable};

/// The storefront's declared route sections.
fn storefront_routes() -> RouteTable {
    RouteTable::new()
        .route("/account", RouteSection::Customer, false)
        .route("/orders", RouteSection::Customer, false)
        .route("/wishlist", RouteSection::Customer, false)
        .route("/admin", RouteSection::Vendor, false)
}

/// Report where a navigation to `path` would land for the current session.
pub async fn route_check(path: &str, format: &OutputFormat) -> Result<()> {
    let manager = build_manager(format)?;
    let _ = manager.restore_session().await;

    let guard = RouteGuard::new(storefront_routes());
    let generation = guard.begin_navigation();
    let outcome = guard
        .resolve(generation, path, manager.context(), manager.client())
        .await;

    match outcome {
        GuardOutcome::Decided(GuardDecision::Allow) => {
            output::print_success(&format!("{}: allow", path), format);
        }
        GuardOutcome::Decided(GuardDecision::RedirectTo(target)) => {
            output::print_success(&format!("{}: redirect to {}", path, target), format);
        }
        // Single navigation here, nothing can supersede it.
        GuardOutcome::Superseded => {}
    }

    Ok(())
}
