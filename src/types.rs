use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::error::{Error, Result};

/// Contract address reported for the native asset, which has none.
pub const NATIVE_CONTRACT: &str = "N/A";

/// A base-unit amount together with its human-readable forms
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    pub raw: String,
    pub decimals: u8,
    /// Exact decimal rendering of `raw / 10^decimals`.
    pub formatted: String,
    pub value: f64,
}

impl Amount {
    /// Parse a base-10 base-unit balance such as `"1000000000000000000"`.
    /// Anything that is not an unsigned 256-bit integer is rejected.
    pub fn parse(raw: &str, decimals: u8) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidBalance(raw.to_string()));
        }
        let units = U256::from_str_radix(trimmed, 10)
            .map_err(|_| Error::InvalidBalance(raw.to_string()))?;

        let formatted = format_balance(&units.to_string(), decimals);
        let value = formatted
            .parse::<f64>()
            .map_err(|_| Error::InvalidBalance(raw.to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            decimals,
            formatted,
            value,
        })
    }
}

/// Place the decimal point `decimals` digits from the right of `digits`
fn format_balance(digits: &str, decimals: u8) -> String {
    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits.to_string()
    };
    let (whole, fractional) = padded.split_at(padded.len() - decimals);
    let trimmed = fractional.trim_end_matches('0');

    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// `GET /{address}/balance`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeBalance {
    pub balance: String,
}

/// One entry of `GET /{address}/erc20`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub decimals: u8,
    pub balance: String,
    /// Heuristic flag from the remote source; not verified here.
    #[serde(default)]
    pub possible_spam: bool,
}

/// `GET /dateToBlock`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub block: u64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub block_timestamp: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub parent_hash: Option<String>,
}

/// USD price of one token, pinned to a block.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub usd_price: f64,
    pub exchange_name: Option<String>,
    /// The remote source found no pool deep enough to price the token.
    pub no_liquidity: bool,
}

impl PriceQuote {
    pub fn no_liquidity() -> Self {
        Self {
            usd_price: 0.0,
            exchange_name: None,
            no_liquidity: true,
        }
    }
}

/// Body of `POST /balances`; `date` and `timestamp` together name the instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub address: String,
    pub chain: String,
    pub date: String,
    pub timestamp: String,
}

/// One reported asset (native or ERC20) for an address at a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub account_address: String,
    pub chain: Chain,
    pub block_number: u64,
    pub asset_symbol: String,
    pub asset_name: String,
    pub contract_address: String,
    pub balance: f64,
    #[serde(skip)]
    pub balance_exact: String,
    pub checker_url: String,
    pub possible_spam: bool,
    pub usd_price: Option<f64>,
    pub usd_value: Option<f64>,
}

impl AssetRecord {
    pub fn is_native(&self) -> bool {
        self.contract_address == NATIVE_CONTRACT
    }
}
