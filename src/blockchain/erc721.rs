// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-721 (NFT) contract interactions.

use std::time::Duration;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::client::ChainError;
use super::types::CollectionInfo;

// Read-only subset of the ERC-721 interface (DropERC721 exposes the same calls)
sol! {
    #[sol(rpc)]
    interface IERC721 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// ERC-721 contract wrapper.
pub struct Erc721Contract<P> {
    contract: IERC721::IERC721Instance<P>,
    address: Address,
}

impl<P: Provider + Clone> Erc721Contract<P> {
    /// Create a new ERC-721 contract instance.
    pub fn new(provider: &P, address: Address) -> Self {
        let contract = IERC721::new(address, provider.clone());
        Self { contract, address }
    }

    /// Number of tokens of this collection held by `owner`.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainError::ContractError(e.to_string()))
    }

    /// Collection name and symbol; missing metadata falls back to placeholders.
    /// Each call is given at most `limit`.
    pub async fn info(&self, limit: Duration) -> CollectionInfo {
        let name: String = match tokio::time::timeout(limit, self.contract.name().call()).await {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                tracing::debug!(contract = %self.address, error = %e, "name() unavailable");
                "Unknown".to_string()
            }
            Err(_) => {
                tracing::debug!(contract = %self.address, "name() timed out");
                "Unknown".to_string()
            }
        };
        let symbol: String = match tokio::time::timeout(limit, self.contract.symbol().call()).await {
            Ok(Ok(symbol)) => symbol,
            Ok(Err(e)) => {
                tracing::debug!(contract = %self.address, error = %e, "symbol() unavailable");
                "???".to_string()
            }
            Err(_) => {
                tracing::debug!(contract = %self.address, "symbol() timed out");
                "???".to_string()
            }
        };

        CollectionInfo {
            contract_address: self.address.to_checksum(None),
            name,
            symbol,
        }
    }
}
