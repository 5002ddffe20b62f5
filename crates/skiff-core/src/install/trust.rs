//! Provenance classification for install requests.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// How much implicit trust the origin of an install request warrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustSource {
    Official,
    ThirdParty,
}

/// Marketplaces with a known classification. Extending this table is a code
/// change, not a runtime operation.
static MARKET_SOURCES: Lazy<HashMap<&'static str, TrustSource>> = Lazy::new(|| {
    HashMap::from([
        ("higress", TrustSource::ThirdParty),
        ("lobehub", TrustSource::Official),
        ("smithery", TrustSource::ThirdParty),
    ])
});

impl TrustSource {
    /// Classify a marketplace identifier, case-insensitively.
    ///
    /// Unknown and absent identifiers never gain implicit trust.
    pub fn from_market_id(market_id: Option<&str>) -> Self {
        market_id
            .and_then(|id| MARKET_SOURCES.get(id.to_lowercase().as_str()).copied())
            .unwrap_or(TrustSource::ThirdParty)
    }
}

impl std::fmt::Display for TrustSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustSource::Official => write!(f, "official"),
            TrustSource::ThirdParty => write!(f, "third_party"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_markets_map_to_their_classification() {
        assert_eq!(
            TrustSource::from_market_id(Some("lobehub")),
            TrustSource::Official
        );
        assert_eq!(
            TrustSource::from_market_id(Some("higress")),
            TrustSource::ThirdParty
        );
        assert_eq!(
            TrustSource::from_market_id(Some("smithery")),
            TrustSource::ThirdParty
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            TrustSource::from_market_id(Some("LobeHub")),
            TrustSource::Official
        );
        assert_eq!(
            TrustSource::from_market_id(Some("SMITHERY")),
            TrustSource::ThirdParty
        );
    }

    #[test]
    fn unknown_and_absent_markets_default_to_third_party() {
        assert_eq!(
            TrustSource::from_market_id(Some("unknown-market")),
            TrustSource::ThirdParty
        );
        assert_eq!(TrustSource::from_market_id(Some("")), TrustSource::ThirdParty);
        assert_eq!(TrustSource::from_market_id(None), TrustSource::ThirdParty);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        for _ in 0..3 {
            assert_eq!(
                TrustSource::from_market_id(Some("lobehub")),
                TrustSource::Official
            );
            assert_eq!(TrustSource::from_market_id(None), TrustSource::ThirdParty);
        }
    }
}
