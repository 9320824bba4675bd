//! Domain/subdomain registry
//!
//! Static lookup tables: domain keys, their display names, the list types
//! (subdomains) each domain offers, and the mapping from legacy category
//! strings to current keys. Lookups never fail hard; unknown input yields
//! `None` and callers render a "domain not found" state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business domain a list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DomainKey {
    /// Healthcare professionals (prescribers)
    Customer,

    /// Institutions, formularies and health systems
    Account,

    /// Campaigns, events and digital engagement
    Marketing,

    /// Data stewardship and analytics segments
    Data,
}

/// Static configuration of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainConfig {
    /// Domain key
    pub key: DomainKey,

    /// Human-readable name
    pub display_name: &'static str,

    /// Allowed list types, in display order
    pub list_types: &'static [&'static str],
}

static DOMAINS: [DomainConfig; 4] = [
    DomainConfig {
        key: DomainKey::Customer,
        display_name: "Customer / HCP",
        list_types: &[
            "Target Lists",
            "Call Lists",
            "High-Value Prescriber Lists",
            "Competitor Target Lists",
        ],
    },
    DomainConfig {
        key: DomainKey::Account,
        display_name: "Account / Institutional",
        list_types: &["Formulary Decision-Maker Lists", "IDN/Health System Lists"],
    },
    DomainConfig {
        key: DomainKey::Marketing,
        display_name: "Marketing Campaign",
        list_types: &["Event Invitation Lists", "Digital Engagement Lists"],
    },
    DomainConfig {
        key: DomainKey::Data,
        display_name: "Data / Analytics",
        list_types: &["Master Data Lists", "Analytics Segment Lists"],
    },
];

/// Legacy category strings and the keys they migrate to
const LEGACY_CATEGORIES: [(&str, DomainKey); 4] = [
    ("Customer/HCP", DomainKey::Customer),
    ("Account/Institutional", DomainKey::Account),
    ("Marketing Campaign", DomainKey::Marketing),
    ("Data/Analytics", DomainKey::Data),
];

impl DomainKey {
    /// All keys in display order
    pub const ALL: [DomainKey; 4] = [
        DomainKey::Customer,
        DomainKey::Account,
        DomainKey::Marketing,
        DomainKey::Data,
    ];

    /// Get the key as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKey::Customer => "Customer",
            DomainKey::Account => "Account",
            DomainKey::Marketing => "Marketing",
            DomainKey::Data => "Data",
        }
    }

    /// Parse a current domain key (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Some(DomainKey::Customer),
            "account" => Some(DomainKey::Account),
            "marketing" => Some(DomainKey::Marketing),
            "data" => Some(DomainKey::Data),
            _ => None,
        }
    }

    /// Resolve a category string that may be a current key or a legacy name
    pub fn resolve(s: &str) -> Option<Self> {
        Self::parse(s).or_else(|| migrate_legacy(s))
    }

    /// Static configuration for this key
    pub fn config(&self) -> &'static DomainConfig {
        match self {
            DomainKey::Customer => &DOMAINS[0],
            DomainKey::Account => &DOMAINS[1],
            DomainKey::Marketing => &DOMAINS[2],
            DomainKey::Data => &DOMAINS[3],
        }
    }

    /// Check whether `list_type` is offered by this domain
    pub fn allows_list_type(&self, list_type: &str) -> bool {
        self.config().list_types.iter().any(|t| *t == list_type)
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DomainKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| format!("Unknown domain: {}", s))
    }
}

/// Look up a domain by key string
pub fn lookup(key: &str) -> Option<&'static DomainConfig> {
    DomainKey::parse(key).map(|k| k.config())
}

/// Display name for a key or legacy category, if known
pub fn display_name(category: &str) -> Option<&'static str> {
    DomainKey::resolve(category).map(|k| k.config().display_name)
}

/// Migrate a legacy category string to its current domain key
pub fn migrate_legacy(category: &str) -> Option<DomainKey> {
    let category = category.trim();
    LEGACY_CATEGORIES
        .iter()
        .find(|(legacy, _)| legacy.eq_ignore_ascii_case(category))
        .map(|(_, key)| *key)
}

/// All domain configurations in display order
pub fn all_domains() -> &'static [DomainConfig] {
    &DOMAINS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_key() {
        let config = lookup("Customer").unwrap();
        assert_eq!(config.display_name, "Customer / HCP");
        assert_eq!(config.list_types[0], "Target Lists");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("marketing").unwrap().key, DomainKey::Marketing);
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert!(lookup("Sales").is_none());
        assert!(lookup("").is_none());
        assert!(display_name("nonsense").is_none());
        assert!(migrate_legacy("Customer").is_none());
    }

    #[test]
    fn test_legacy_migration() {
        assert_eq!(migrate_legacy("Customer/HCP"), Some(DomainKey::Customer));
        assert_eq!(migrate_legacy("Account/Institutional"), Some(DomainKey::Account));
        assert_eq!(migrate_legacy("Marketing Campaign"), Some(DomainKey::Marketing));
        assert_eq!(migrate_legacy("Data/Analytics"), Some(DomainKey::Data));
    }

    #[test]
    fn test_resolve_accepts_both_forms() {
        assert_eq!(DomainKey::resolve("Data"), Some(DomainKey::Data));
        assert_eq!(DomainKey::resolve("Data/Analytics"), Some(DomainKey::Data));
        assert_eq!(display_name("Customer/HCP"), Some("Customer / HCP"));
    }

    #[test]
    fn test_list_type_membership() {
        assert!(DomainKey::Account.allows_list_type("IDN/Health System Lists"));
        assert!(!DomainKey::Account.allows_list_type("Call Lists"));
    }

    #[test]
    fn test_configs_match_keys() {
        for key in DomainKey::ALL {
            assert_eq!(key.config().key, key);
            assert!(!key.config().list_types.is_empty());
        }
        assert_eq!(all_domains().len(), DomainKey::ALL.len());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary input never panics, and anything that resolves round-trips
        #[test]
        fn test_resolve_never_panics(input in ".*") {
            if let Some(key) = DomainKey::resolve(&input) {
                prop_assert_eq!(DomainKey::parse(key.as_str()), Some(key));
            }
            let _ = lookup(&input);
            let _ = display_name(&input);
        }
    }
}
