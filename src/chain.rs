use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical chain identifiers, as the remote API expects them in `?chain=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Eth,
    Arbitrum,
    Polygon,
    Bsc,
    Fantom,
    Avalanche,
    Cronos,
}

impl Chain {
    pub const ALL: [Chain; 7] = [
        Chain::Eth,
        Chain::Arbitrum,
        Chain::Polygon,
        Chain::Bsc,
        Chain::Fantom,
        Chain::Avalanche,
        Chain::Cronos,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Chain::Eth => "eth",
            Chain::Arbitrum => "arbitrum",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
            Chain::Fantom => "fantom",
            Chain::Avalanche => "avalanche",
            Chain::Cronos => "cronos",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Lower-cases the input and collapses runs of whitespace, so that
/// `"  Binance   Smart Chain "` and `"binance smart chain"` look up the same alias.
pub fn normalize_alias(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids_serialize_lowercase() {
        for chain in Chain::ALL {
            let json = serde_json::to_string(&chain).unwrap();
            assert_eq!(json, format!("\"{}\"", chain.id()));
        }
    }

    #[test]
    fn test_normalize_alias() {
        assert_eq!(normalize_alias("ETH"), "eth");
        assert_eq!(normalize_alias("  Binance   Smart Chain "), "binance smart chain");
        assert_eq!(normalize_alias(""), "");
    }
}
