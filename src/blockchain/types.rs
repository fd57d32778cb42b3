// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use serde::{Deserialize, Serialize};

/// EVM network configuration.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// Native token symbol
    pub native_symbol: &'static str,
    /// Native token decimals
    pub native_decimals: u8,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Soneium mainnet configuration.
pub const SONEIUM_MAINNET: NetworkConfig = NetworkConfig {
    name: "Soneium",
    chain_id: 1868,
    native_symbol: "ETH",
    native_decimals: 18,
    explorer_url: "https://soneium.blockscout.com",
};

/// Public Soneium RPC endpoint.
pub const SONEIUM_RPC_URL: &str = "https://soneium.drpc.org";

/// DropERC721 collection audited by default.
pub const DEFAULT_NFT_CONTRACT: &str = "0x64eA937352996dCa9B32D7A6a883FAa6C651Ccfc";

/// Name and symbol of the audited NFT collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Contract address (checksummed)
    pub contract_address: String,
    /// Collection name, "Unknown" if the contract does not expose one
    pub name: String,
    /// Collection symbol, "???" if the contract does not expose one
    pub symbol: String,
}

impl NetworkConfig {
    /// Explorer link for an address.
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }
}
