use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::chain::Chain;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::price::classify_price_response;
use crate::provider::DataProvider;
use crate::types::{BlockInfo, NativeBalance, PriceQuote, TokenBalance};

/// Moralis Web3 Data API client
pub struct MoralisClient {
    client: Client,
    base_url: Url,
}

impl MoralisClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let api_key = HeaderValue::from_str(&settings.api_key).map_err(|_| {
            Error::InvalidSetting {
                name: "MORALIS_API_KEY",
                value: "<redacted>".to_string(),
            }
        })?;
        headers.insert("X-API-Key", api_key);

        let base_url = Url::parse(&settings.api_url).map_err(|_| Error::InvalidSetting {
            name: "MORALIS_API_URL",
            value: settings.api_url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidSetting {
                name: "MORALIS_API_URL",
                value: settings.api_url.clone(),
            });
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T> {
        let response = self.send(segments, query).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| Error::Decode { context, source })
    }

    /// Each segment is percent-encoded on its own, so caller-supplied
    /// addresses cannot add path segments, a query or a fragment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidSetting {
                name: "MORALIS_API_URL",
                value: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!("GET {} {:?}", url, query);

        Ok(self.client.get(url).query(query).send().await?)
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl DataProvider for MoralisClient {
    async fn block_at(&self, chain: Chain, unix_time: i64) -> Result<BlockInfo> {
        self.get(
            &["dateToBlock"],
            &[
                ("chain", chain.id().to_string()),
                ("date", unix_time.to_string()),
            ],
            "date to block",
        )
        .await
    }

    async fn native_balance(
        &self,
        address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<NativeBalance> {
        self.get(
            &[address, "balance"],
            &[
                ("chain", chain.id().to_string()),
                ("to_block", block.to_string()),
            ],
            "native balance",
        )
        .await
    }

    async fn token_balances(
        &self,
        address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<Vec<TokenBalance>> {
        self.get(
            &[address, "erc20"],
            &[
                ("chain", chain.id().to_string()),
                ("to_block", block.to_string()),
            ],
            "token balances",
        )
        .await
    }

    async fn token_price(
        &self,
        token_address: &str,
        chain: Chain,
        block: u64,
    ) -> Result<PriceQuote> {
        let response = self
            .send(
                &["erc20", token_address, "price"],
                &[
                    ("chain", chain.id().to_string()),
                    ("to_block", block.to_string()),
                ],
            )
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        classify_price_response(token_address, status, &body)
    }
}
