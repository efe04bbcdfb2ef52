use alloy_primitives::U64;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// An EIP-1193 style provider: the wallet extension injected in the page, or
/// a plain JSON-RPC endpoint.
///
/// Implementations are single-threaded; futures are not `Send`.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// Issues `method` and decodes the result into `T`.
pub async fn request_as<T, W>(provider: &W, method: &str, params: Value) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    W: WalletProvider + ?Sized,
{
    let value = provider.request(method, params).await?;
    Ok(serde_json::from_value(value)?)
}

/// Parses a `0x`-prefixed quantity such as the result of `eth_chainId`.
pub fn parse_quantity(value: &Value) -> Result<u64, ProviderError> {
    let quantity: U64 = serde_json::from_value(value.clone())?;
    Ok(quantity.to::<u64>())
}

#[derive(Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl<T> RpcResponse<T> {
    pub fn into_result(self) -> Result<Option<T>, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(self.result)
    }
}

#[cfg(feature = "http")]
pub use http::HttpProvider;

#[cfg(feature = "http")]
mod http {
    use std::cell::Cell;

    use alloy_primitives::Address;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::{RpcRequest, RpcResponse, WalletProvider};
    use crate::error::ProviderError;

    /// JSON-RPC provider without a wallet behind it.
    ///
    /// Account requests are answered locally from the watch list so a session
    /// can be connected for read-only use. Anything needing a signature is
    /// forwarded and rejected by the node.
    pub struct HttpProvider {
        client: reqwest::Client,
        url: String,
        accounts: Vec<Address>,
        next_id: Cell<u64>,
    }

    impl HttpProvider {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                url: url.into(),
                accounts: Vec::new(),
                next_id: Cell::new(1),
            }
        }

        /// Adds an address the provider reports as its selected account.
        pub fn with_account(mut self, account: Address) -> Self {
            self.accounts.push(account);
            self
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for HttpProvider {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            if matches!(method, "eth_accounts" | "eth_requestAccounts") {
                return Ok(json!(self.accounts));
            }

            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let request = RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            };

            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;

            let rpc_response: RpcResponse<Value> = response
                .json()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()))?;

            Ok(rpc_response.into_result()?.unwrap_or(Value::Null))
        }
    }
}
