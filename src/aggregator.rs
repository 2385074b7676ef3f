use tracing::{debug, info};

use crate::block::resolve_block;
use crate::config::{ChainConfig, ChainRegistry};
use crate::error::{Error, Result};
use crate::provider::DataProvider;
use crate::types::{Amount, AssetRecord, BalanceRequest, NATIVE_CONTRACT};

/// Builds balance reports: resolves the chain and block, then fetches and
/// prices every asset the address holds at that block.
pub struct Aggregator<P> {
    provider: P,
    registry: ChainRegistry,
}

impl<P: DataProvider> Aggregator<P> {
    pub fn new(provider: P, registry: ChainRegistry) -> Self {
        Self { provider, registry }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One record for the native asset followed by one per ERC20 token.
    ///
    /// Any failure aborts the whole report; nothing partial is returned.
    pub async fn report(&self, request: &BalanceRequest) -> Result<Vec<AssetRecord>> {
        let address = request.address.trim();
        if address.is_empty() {
            return Err(Error::InvalidRequest("address is required".to_string()));
        }

        let chain = self.registry.resolve(&request.chain)?;
        let block = resolve_block(&self.provider, chain.id, &request.date, &request.timestamp).await?;

        self.report_at(address, chain, block).await
    }

    /// Same as [`Aggregator::report`] for an already resolved chain and block
    pub async fn report_at(
        &self,
        address: &str,
        chain: &ChainConfig,
        block: u64,
    ) -> Result<Vec<AssetRecord>> {
        let native = self.provider.native_balance(address, chain.id, block).await?;
        let native = Amount::parse(&native.balance, chain.native_token.decimals)?;

        let mut records = vec![AssetRecord {
            account_address: address.to_string(),
            chain: chain.id,
            block_number: block,
            asset_symbol: chain.native_token.symbol.clone(),
            asset_name: chain.native_token.name.clone(),
            contract_address: NATIVE_CONTRACT.to_string(),
            balance: native.value,
            balance_exact: native.formatted,
            checker_url: chain.native_checker.clone(),
            possible_spam: false,
            usd_price: None,
            usd_value: None,
        }];

        let tokens = self.provider.token_balances(address, chain.id, block).await?;
        debug!("{} holds {} tokens on {} at block {}", address, tokens.len(), chain.id, block);

        for token in tokens {
            let amount = Amount::parse(&token.balance, token.decimals)?;
            let quote = self
                .provider
                .token_price(&token.token_address, chain.id, block)
                .await?;

            records.push(AssetRecord {
                account_address: address.to_string(),
                chain: chain.id,
                block_number: block,
                asset_symbol: token.symbol.unwrap_or_default(),
                asset_name: token.name.unwrap_or_default(),
                contract_address: token.token_address,
                balance: amount.value,
                balance_exact: amount.formatted,
                checker_url: chain.token_checker.clone(),
                possible_spam: token.possible_spam || quote.no_liquidity,
                usd_price: Some(quote.usd_price),
                usd_value: Some(amount.value * quote.usd_price),
            });
        }

        info!(
            "Reported {} assets for {} on {} at block {}",
            records.len(),
            address,
            chain.id,
            block
        );

        Ok(records)
    }
}
