//! In-memory [`DataProvider`] for orchestration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::DataProvider;
use crate::types::{BlockInfo, NativeBalance, PriceQuote, TokenBalance};

pub const BLOCK: u64 = 16308189;

#[derive(Default)]
pub struct FakeProvider {
    /// Raw native balance per address; unknown addresses fail like a bad request.
    pub natives: HashMap<String, String>,
    pub tokens: HashMap<String, Vec<TokenBalance>>,
    /// USD price per token contract; unknown contracts have no liquidity.
    pub prices: HashMap<String, f64>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_native(mut self, address: &str, raw: &str) -> Self {
        self.natives.insert(address.to_string(), raw.to_string());
        self
    }

    pub fn with_tokens(mut self, address: &str, tokens: Vec<TokenBalance>) -> Self {
        self.tokens.insert(address.to_string(), tokens);
        self
    }

    pub fn with_price(mut self, token_address: &str, usd: f64) -> Self {
        self.prices.insert(token_address.to_string(), usd);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn token(address: &str, symbol: &str, decimals: u8, balance: &str, spam: bool) -> TokenBalance {
    TokenBalance {
        token_address: address.to_string(),
        name: Some(format!("{symbol} Token")),
        symbol: Some(symbol.to_string()),
        logo: None,
        thumbnail: None,
        decimals,
        balance: balance.to_string(),
        possible_spam: spam,
    }
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn block_at(&self, chain: Chain, unix_time: i64) -> Result<BlockInfo> {
        self.record(format!("block_at {chain} {unix_time}"));
        Ok(BlockInfo {
            block: BLOCK,
            date: None,
            timestamp: Some(unix_time),
            block_timestamp: None,
            hash: None,
            parent_hash: None,
        })
    }

    async fn native_balance(
        &self,
        address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<NativeBalance> {
        self.record(format!("native_balance {address} {chain} {block}"));
        match self.natives.get(address) {
            Some(balance) => Ok(NativeBalance {
                balance: balance.clone(),
            }),
            None => Err(Error::Api {
                status: 400,
                message: format!("{address} is not a valid address"),
            }),
        }
    }

    async fn token_balances(
        &self,
        address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<Vec<TokenBalance>> {
        self.record(format!("token_balances {address} {chain} {block}"));
        Ok(self.tokens.get(address).cloned().unwrap_or_default())
    }

    async fn token_price(
        &self,
        token_address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<PriceQuote> {
        self.record(format!("token_price {token_address} {chain} {block}"));
        Ok(match self.prices.get(token_address) {
            Some(&usd_price) => PriceQuote {
                usd_price,
                exchange_name: Some("Fake Exchange".to_string()),
                no_liquidity: false,
            },
            None => PriceQuote::no_liquidity(),
        })
    }
}
