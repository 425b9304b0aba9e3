//! Site identity for multi-site installations.

use serde::{Deserialize, Serialize};

/// Identifier of one site in a multi-site installation.
///
/// Threaded explicitly through every cache key and content store call.
/// Always in `1..=i64::MAX` so it maps onto a SQLite integer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SiteId(i64);

impl SiteId {
    #[cfg(test)]
    pub fn new(id: i64) -> Self {
        assert!(id > 0, "site IDs are positive");
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for SiteId {
    type Error = String;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match i64::try_from(id) {
            Ok(0) => Err("Site ID must be a positive integer".to_string()),
            Ok(id) => Ok(SiteId(id)),
            Err(_) => Err(format!("Site ID {} is out of range", id)),
        }
    }
}

impl From<SiteId> for u64 {
    fn from(site: SiteId) -> Self {
        site.0.unsigned_abs()
    }
}

impl std::str::FromStr for SiteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("Invalid site ID: {}", s))?;
        SiteId::try_from(id)
    }
}
