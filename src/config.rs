use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::chain::{normalize_alias, Chain};
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://deep-index.moralis.io/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a single chain
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub id: Chain,
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(rename = "nativeToken")]
    pub native_token: TokenInfo,
    /// Explorer page for checking the native balance of an address.
    #[serde(rename = "nativeChecker")]
    pub native_checker: String,
    /// Explorer page for checking ERC20 balances of an address.
    #[serde(rename = "tokenChecker")]
    pub token_checker: String,
}

/// Native asset information from config
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
struct ChainTable {
    chains: Vec<ChainConfig>,
}

/// Every supported chain, keyed by normalized alias.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
    aliases: HashMap<String, usize>,
}

impl ChainRegistry {
    /// Load the chain table from embedded JSON
    pub fn load() -> Result<Self> {
        Self::from_json(include_str!("../config.json"))
    }

    /// Parse and validate a chain table. Every [`Chain`] must have exactly one
    /// entry and no alias may point at two chains.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: ChainTable =
            serde_json::from_str(json).map_err(|e| Error::ChainTable(e.to_string()))?;

        let mut aliases = HashMap::new();
        for (index, chain) in table.chains.iter().enumerate() {
            let names = std::iter::once(chain.id.id().to_string()).chain(chain.aliases.clone());
            for name in names {
                let key = normalize_alias(&name);
                match aliases.insert(key.clone(), index) {
                    Some(previous) if previous != index => {
                        return Err(Error::ChainTable(format!(
                            "alias '{}' maps to both {} and {}",
                            key, table.chains[previous].id, chain.id
                        )));
                    }
                    _ => {}
                }
            }
        }

        for chain in Chain::ALL {
            let count = table.chains.iter().filter(|c| c.id == chain).count();
            if count != 1 {
                return Err(Error::ChainTable(format!(
                    "expected one entry for {}, found {}",
                    chain, count
                )));
            }
        }

        Ok(Self {
            chains: table.chains,
            aliases,
        })
    }

    /// Resolve free text such as `"MATIC"` or `"bnb chain"` to its chain entry.
    pub fn resolve(&self, input: &str) -> Result<&ChainConfig> {
        self.aliases
            .get(&normalize_alias(input))
            .map(|&index| &self.chains[index])
            .ok_or_else(|| self.unsupported(input))
    }

    pub fn get(&self, chain: Chain) -> Result<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.id == chain)
            .ok_or_else(|| self.unsupported(chain.id()))
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    fn unsupported(&self, input: &str) -> Error {
        let supported = self
            .chains
            .iter()
            .map(|c| c.id.id())
            .collect::<Vec<_>>()
            .join(", ");
        Error::UnsupportedChain {
            input: input.to_string(),
            supported,
        }
    }
}

/// Runtime settings for the remote API, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("MORALIS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingSetting("MORALIS_API_KEY"))?;

        let api_url = lookup("MORALIS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| Error::InvalidSetting {
                    name: "REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            api_url,
            request_timeout,
        })
    }
}
