//! Route table with declared sections.
//!
//! Each route declares which section of the storefront it belongs to at
//! table construction time, so the guard never has to inspect the URL
//! string for role hints.

use serde::{Deserialize, Serialize};

/// The section of the storefront a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSection {
    /// Customer-facing pages (account, orders, wishlist, shop browsing)
    Customer,
    /// Vendor dashboard pages
    Vendor,
}

/// A guarded route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path prefix this route covers (e.g. `/admin`)
    pub path: String,
    /// Declared section membership
    pub section: RouteSection,
    /// Whether the route demands the vendor role even outside the vendor
    /// section
    pub requires_vendor: bool,
}

/// Routes declared at construction time, matched by longest path prefix.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a route.
    pub fn route(
        mut self,
        path: impl Into<String>,
        section: RouteSection,
        requires_vendor: bool,
    ) -> Self {
        self.routes.push(Route {
            path: path.into(),
            section,
            requires_vendor,
        });
        self
    }

    /// Find the route covering a path, preferring the longest prefix.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|r| path == r.path || path.starts_with(&format!("{}/", r.path)))
            .max_by_key(|r| r.path.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new()
            .route("/account", RouteSection::Customer, false)
            .route("/customer/orders", RouteSection::Customer, false)
            .route("/admin", RouteSection::Vendor, false)
    }

    #[test]
    fn test_exact_match() {
        let t = table();
        assert_eq!(t.resolve("/admin").unwrap().section, RouteSection::Vendor);
    }

    #[test]
    fn test_prefix_match_covers_subpaths() {
        let t = table();
        let route = t.resolve("/admin/products/3").unwrap();
        assert_eq!(route.path, "/admin");
        assert_eq!(route.section, RouteSection::Vendor);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let t = RouteTable::new()
            .route("/customer", RouteSection::Customer, false)
            .route("/customer/invoices", RouteSection::Customer, true);

        let route = t.resolve("/customer/invoices/9").unwrap();
        assert!(route.requires_vendor);
    }

    #[test]
    fn test_no_partial_segment_match() {
        let t = table();
        // "/administrator" is not under "/admin"
        assert!(t.resolve("/administrator").is_none());
    }

    #[test]
    fn test_unknown_path_resolves_to_none() {
        let t = table();
        assert!(t.resolve("/checkout").is_none());
    }
}
