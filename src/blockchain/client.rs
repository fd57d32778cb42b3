// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the audited EVM chain.

use std::future::Future;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};

use super::erc721::Erc721Contract;
use super::types::*;

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Default upper bound for a single RPC request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// The two on-chain facts read for every audited wallet.
pub trait ChainReader {
    /// Native token balance in wei at the latest block.
    fn native_balance(&self, owner: Address)
        -> impl Future<Output = Result<U256, ChainError>> + Send;

    /// Number of tokens of the audited NFT collection held by `owner`.
    fn nft_balance(&self, owner: Address) -> impl Future<Output = Result<U256, ChainError>> + Send;
}

/// Read-only chain client bound to one RPC endpoint and one NFT contract.
pub struct ChainClient {
    /// Network configuration
    network: NetworkConfig,
    /// Endpoint that answered the connection probe
    rpc_url: String,
    /// Chain id reported by the endpoint
    remote_chain_id: u64,
    /// Alloy HTTP provider
    provider: HttpProvider,
    /// Audited NFT collection
    nft: Erc721Contract<HttpProvider>,
    /// Upper bound for each request
    request_timeout: Duration,
}

impl ChainClient {
    /// Connect to the first endpoint in `rpc_urls` that answers `eth_chainId`
    /// within `request_timeout`.
    pub async fn connect(
        rpc_urls: &[String],
        network: NetworkConfig,
        nft_contract: Address,
        request_timeout: Duration,
    ) -> Result<Self, ChainError> {
        let mut last_error = None;

        for rpc_url in rpc_urls {
            let url = match rpc_url.parse::<url::Url>() {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(rpc_url = %rpc_url, error = %e, "Skipping invalid RPC URL");
                    last_error = Some(ChainError::InvalidRpcUrl(format!("{rpc_url}: {e}")));
                    continue;
                }
            };

            let provider = ProviderBuilder::new().connect_http(url);

            let probe = async {
                provider
                    .get_chain_id()
                    .await
                    .map_err(|e| ChainError::RpcError(e.to_string()))
            };

            match with_timeout(request_timeout, probe).await {
                Ok(remote_chain_id) => {
                    if remote_chain_id != network.chain_id {
                        tracing::warn!(
                            rpc_url = %rpc_url,
                            expected = network.chain_id,
                            actual = remote_chain_id,
                            "RPC endpoint reports a different chain id"
                        );
                    }
                    tracing::info!(
                        rpc_url = %rpc_url,
                        chain_id = remote_chain_id,
                        network = network.name,
                        "Connected to RPC endpoint"
                    );

                    let nft = Erc721Contract::new(&provider, nft_contract);
                    return Ok(Self {
                        network,
                        rpc_url: rpc_url.clone(),
                        remote_chain_id,
                        provider,
                        nft,
                        request_timeout,
                    });
                }
                Err(e) => {
                    tracing::warn!(rpc_url = %rpc_url, error = %e, "RPC endpoint unreachable");
                    last_error = Some(e);
                }
            }
        }

        Err(ChainError::Unreachable(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no RPC URL configured".to_string()),
        ))
    }

    /// Get the current block number.
    pub async fn get_block_number(&self) -> Result<u64, ChainError> {
        let request = async {
            self.provider
                .get_block_number()
                .await
                .map_err(|e| ChainError::RpcError(e.to_string()))
        };
        with_timeout(self.request_timeout, request).await
    }

    /// Name and symbol of the audited NFT collection.
    pub async fn collection_info(&self) -> CollectionInfo {
        self.nft.info(self.request_timeout).await
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Endpoint in use.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Chain id reported by the endpoint.
    pub fn remote_chain_id(&self) -> u64 {
        self.remote_chain_id
    }
}

impl ChainReader for ChainClient {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError> {
        let request = async {
            self.provider
                .get_balance(owner)
                .await
                .map_err(|e| ChainError::RpcError(e.to_string()))
        };
        with_timeout(self.request_timeout, request).await
    }

    async fn nft_balance(&self, owner: Address) -> Result<U256, ChainError> {
        with_timeout(self.request_timeout, self.nft.balance_of(owner)).await
    }
}

/// Fail `request` with [`ChainError::Timeout`] once `limit` elapses.
async fn with_timeout<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, ChainError>>,
) -> Result<T, ChainError> {
    tokio::time::timeout(limit, request)
        .await
        .map_err(|_| ChainError::Timeout(limit))?
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("RPC request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No reachable RPC endpoint: {0}")]
    Unreachable(String),
}
