//! Replica configuration
//!
//! A replica needs exactly one piece of runtime configuration: its site
//! identifier. `(site, counter)` pairs identify operations globally, so the
//! default site id is a random v4 UUID rather than a short random string.

use crate::SiteID;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Configuration for a single replica session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Site identifier stamped on every position this replica generates
    pub site: SiteID,
}

impl ReplicaConfig {
    /// Create a configuration with a freshly generated site id
    pub fn new() -> Self {
        Self {
            site: generate_site_id(),
        }
    }

    /// Use an explicit site id (server-issued ids, tests)
    pub fn with_site(site: impl Into<SiteID>) -> Self {
        Self { site: site.into() }
    }
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a 128-bit random site identifier in simple (hex) form
pub fn generate_site_id() -> SiteID {
    Uuid::new_v4().simple().to_string()
}
