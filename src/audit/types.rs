// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Results of the batch audit operations.

use alloy::primitives::U256;

use crate::input::WalletEntry;

/// On-chain facts read for a verified wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holdings {
    /// Native balance in wei
    pub native_balance: U256,
    /// Tokens held in the audited NFT collection
    pub nft_count: U256,
}

/// A wallet skipped because verification or an RPC read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFailure {
    pub index: usize,
    pub address: String,
    pub error: String,
}

/// Full report line for one wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletReport {
    pub entry: WalletEntry,
    /// Holdings, or the error message that stopped the wallet
    pub outcome: Result<Holdings, String>,
}

impl WalletReport {
    /// Native balance, zero for failed wallets.
    pub fn native_balance(&self) -> U256 {
        self.outcome
            .as_ref()
            .map(|h| h.native_balance)
            .unwrap_or(U256::ZERO)
    }

    /// NFT count, zero for failed wallets.
    pub fn nft_count(&self) -> U256 {
        self.outcome.as_ref().map(|h| h.nft_count).unwrap_or(U256::ZERO)
    }
}

/// Output of the full inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullReport {
    pub wallets: Vec<WalletReport>,
    pub cancelled: bool,
}

impl FullReport {
    /// Wallets that failed verification or an RPC read.
    pub fn failures(&self) -> Vec<WalletFailure> {
        self.wallets
            .iter()
            .filter_map(|w| {
                w.outcome.as_ref().err().map(|error| WalletFailure {
                    index: w.entry.index,
                    address: w.entry.address.clone(),
                    error: error.clone(),
                })
            })
            .collect()
    }
}

/// Native balance of each verified wallet and their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    pub balances: Vec<(WalletEntry, U256)>,
    pub total: U256,
    pub failures: Vec<WalletFailure>,
    pub cancelled: bool,
}

/// Wallets holding at least one token of the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftHolders {
    pub holders: Vec<(WalletEntry, Holdings)>,
    /// Sum of NFT counts over every wallet whose count could be read
    pub total_nft: U256,
    pub failures: Vec<WalletFailure>,
    pub cancelled: bool,
}

/// Private keys selected by a predicate, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySelection {
    pub keys: Vec<String>,
    pub failures: Vec<WalletFailure>,
    pub cancelled: bool,
}
