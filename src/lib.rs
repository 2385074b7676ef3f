mod aggregator;
mod batch;
mod block;
mod chain;
mod config;
mod error;
mod moralis;
mod price;
mod provider;
mod server;
#[cfg(test)]
mod testing;
mod types;

pub use aggregator::Aggregator;
pub use batch::{
    run_batch, run_batch_file, BatchOptions, BatchSummary, RowFailure, DEFAULT_DATE,
    DEFAULT_OUTPUT, DEFAULT_TIME, OUTPUT_HEADERS,
};
pub use block::{parse_timestamp, resolve_block};
pub use chain::{normalize_alias, Chain};
pub use config::{ChainConfig, ChainRegistry, Settings, TokenInfo};
pub use error::{Error, Result};
pub use moralis::MoralisClient;
pub use price::{classify_price_response, NO_LIQUIDITY_MESSAGE};
pub use provider::DataProvider;
pub use server::{router, serve};
pub use types::{
    Amount, AssetRecord, BalanceRequest, BlockInfo, NativeBalance, PriceQuote, TokenBalance,
    NATIVE_CONTRACT,
};

/// Aggregator backed by the Moralis API and the embedded chain table
pub fn connect(settings: &Settings) -> Result<Aggregator<MoralisClient>> {
    let provider = MoralisClient::new(settings)?;
    let registry = ChainRegistry::load()?;

    Ok(Aggregator::new(provider, registry))
}

/// Get balances for an address on a chain at a point in time
pub async fn get_balances(settings: &Settings, request: &BalanceRequest) -> Result<Vec<AssetRecord>> {
    connect(settings)?.report(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_balances_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dateToBlock"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "block": 16308189 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/0xabc/balance"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "balance": "250000000000000000" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/0xabc/erc20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "token_address": "0xtoken",
                "name": "Spam",
                "symbol": "SPAM",
                "decimals": 9,
                "balance": "1000000000",
                "possible_spam": false
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/erc20/0xtoken/price"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "No pools found with enough liquidity, to calculate the price"
            })))
            .mount(&server)
            .await;

        let settings = Settings {
            api_key: "test-api-key".to_string(),
            api_url: server.uri(),
            request_timeout: Duration::from_secs(5),
        };
        let request = BalanceRequest {
            address: "0xabc".to_string(),
            chain: "Cronos".to_string(),
            date: "2022-12-31".to_string(),
            timestamp: "23:59".to_string(),
        };

        let records = get_balances(&settings, &request).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].asset_symbol, "CRO");
        assert_eq!(records[0].balance, 0.25);
        assert_eq!(records[0].block_number, 16308189);
        assert_eq!(records[1].balance, 1.0);
        assert!(records[1].possible_spam);
        assert_eq!(records[1].usd_value, Some(0.0));
        assert_eq!(records[1].checker_url, "https://cronoscan.com/tokencheck-tool");
    }
}
