use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::PriceQuote;

/// Message the price endpoint returns for tokens without a usable pool.
pub const NO_LIQUIDITY_MESSAGE: &str = "No pools found with enough liquidity";

#[derive(Debug, Deserialize)]
struct PriceBody {
    #[serde(rename = "usdPrice")]
    usd_price: f64,
    #[serde(rename = "exchangeName", default)]
    exchange_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a price endpoint response into a quote.
///
/// A failure whose message mentions missing liquidity is not an error: the
/// token is priced at zero and marked as illiquid. Any other failure is
/// returned as [`Error::Api`].
pub fn classify_price_response(
    token_address: &str,
    status: u16,
    body: &str,
) -> Result<PriceQuote> {
    if (200..300).contains(&status) {
        let price: PriceBody = serde_json::from_str(body).map_err(|source| Error::Decode {
            context: "token price",
            source,
        })?;
        debug!(
            "Priced {} at {} USD (exchange: {})",
            token_address,
            price.usd_price,
            price.exchange_name.as_deref().unwrap_or("unknown")
        );
        return Ok(PriceQuote {
            usd_price: price.usd_price,
            exchange_name: price.exchange_name,
            no_liquidity: false,
        });
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    if message.contains(NO_LIQUIDITY_MESSAGE) {
        warn!(
            "No liquidity for token {}, most likely spam. Pricing at 0",
            token_address
        );
        return Ok(PriceQuote::no_liquidity());
    }

    Err(Error::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const TOKEN: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

    #[test]
    fn test_successful_quote() {
        let body = r#"{
            "nativePrice": { "value": "1", "decimals": 18, "name": "Ether", "symbol": "ETH" },
            "usdPrice": 1.0003,
            "exchangeAddress": "0x1f98431c8ad98523631ae4a59f267346ea31f984",
            "exchangeName": "Uniswap v3"
        }"#;
        let quote = assert_ok!(classify_price_response(TOKEN, 200, body));
        assert_eq!(quote.usd_price, 1.0003);
        assert_eq!(quote.exchange_name.as_deref(), Some("Uniswap v3"));
        assert!(!quote.no_liquidity);
    }

    #[test]
    fn test_no_liquidity_is_zero_price() {
        let body = r#"{"message":"No pools found with enough liquidity, to calculate the price"}"#;
        let quote = assert_ok!(classify_price_response(TOKEN, 404, body));
        assert_eq!(quote, PriceQuote::no_liquidity());
        assert_eq!(quote.usd_price, 0.0);
    }

    #[test]
    fn test_other_errors_propagate() {
        let body = r#"{"message":"Invalid key"}"#;
        let err = assert_err!(classify_price_response(TOKEN, 401, body));
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_json_error_body() {
        let err = assert_err!(classify_price_response(TOKEN, 502, "Bad Gateway"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_malformed_success_body() {
        let err = assert_err!(classify_price_response(TOKEN, 200, "{}"));
        assert!(matches!(err, Error::Decode { .. }));
    }
}
