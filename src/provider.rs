use async_trait::async_trait;

use crate::chain::Chain;
use crate::error::Result;
use crate::types::{BlockInfo, NativeBalance, PriceQuote, TokenBalance};

/// Remote blockchain-data source - implement this for each API vendor
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Block that was current on `chain` at `unix_time` (seconds, UTC)
    async fn block_at(&self, chain: Chain, unix_time: i64) -> Result<BlockInfo>;

    /// Native balance of an address as of `block`, in base units (18 decimals)
    async fn native_balance(&self, address: &str, chain: Chain, block: u64)
        -> Result<NativeBalance>;

    /// ERC20 balances of an address as of `block`, in the order the source returns them
    async fn token_balances(
        &self,
        address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<Vec<TokenBalance>>;

    /// USD price of a token contract as of `block`
    async fn token_price(&self, token_address: &str, chain: Chain, block: u64)
        -> Result<PriceQuote>;
}
