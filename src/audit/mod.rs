// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Batch Auditor
//!
//! Walks the wallet batch sequentially. For every wallet the private key is
//! first checked against the supplied address; only verified wallets are
//! queried on chain.
//!
//! ## Failure handling
//!
//! A wallet whose verification or RPC read fails is logged, recorded as a
//! [`WalletFailure`] and skipped. The batch always runs to completion unless
//! the cancellation token fires, in which case the results gathered so far
//! are returned with `cancelled` set.
//!
//! Every RPC read is raced against the token, so a stalled endpoint cannot
//! hold the batch past an interrupt. The wallet whose read was abandoned is
//! left out of the results rather than reported as a failure.

pub mod types;

use std::future::Future;

use alloy::primitives::{Address, U256};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::blockchain::{format_amount, verify_pair, ChainError, ChainReader, NetworkConfig};
use crate::error::AuditError;
use crate::input::WalletEntry;

pub use types::*;

/// Sequential auditor over a [`ChainReader`].
pub struct Auditor<R> {
    reader: R,
    network: NetworkConfig,
    shutdown: CancellationToken,
}

impl<R: ChainReader> Auditor<R> {
    /// Create an auditor that stops once `shutdown` fires.
    pub fn new(reader: R, network: NetworkConfig, shutdown: CancellationToken) -> Self {
        Self {
            reader,
            network,
            shutdown,
        }
    }

    /// Token that stops the auditor.
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Network the balances are denominated in.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Verify, then read the native balance and NFT count of every wallet.
    pub async fn inspect_all(&self, batch: &[WalletEntry]) -> FullReport {
        let mut report = FullReport::default();

        for entry in batch {
            if self.stop_requested() {
                report.cancelled = true;
                break;
            }

            let outcome = match self.inspect(entry).await {
                Ok(holdings) => {
                    info!(
                        wallet = entry.index,
                        address = %entry.address,
                        balance = %self.display(holdings.native_balance),
                        nft_count = %holdings.nft_count,
                        "Wallet inspected"
                    );
                    Ok(holdings)
                }
                Err(AuditError::Cancelled) => {
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    log_failure(entry, &e);
                    Err(e.to_string())
                }
            };

            report.wallets.push(WalletReport {
                entry: entry.clone(),
                outcome,
            });
        }

        report
    }

    /// Sum the native balances of all verified wallets.
    pub async fn total_balance(&self, batch: &[WalletEntry]) -> BalanceSummary {
        let mut summary = BalanceSummary::default();

        for entry in batch {
            if self.stop_requested() {
                summary.cancelled = true;
                break;
            }

            let result = async {
                let owner = verify_pair(&entry.address, &entry.private_key)?;
                self.read(self.reader.native_balance(owner)).await
            }
            .await;

            match result {
                Ok(balance) => {
                    info!(
                        wallet = entry.index,
                        address = %entry.address,
                        balance = %self.display(balance),
                        "Native balance read"
                    );
                    summary.total = summary.total.saturating_add(balance);
                    summary.balances.push((entry.clone(), balance));
                }
                Err(AuditError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => summary.failures.push(log_failure(entry, &e)),
            }
        }

        summary
    }

    /// Collect wallets holding NFTs and the NFT total over the batch.
    ///
    /// The native balance is only read for holders.
    pub async fn nft_holders(&self, batch: &[WalletEntry]) -> NftHolders {
        let mut result = NftHolders::default();

        for entry in batch {
            if self.stop_requested() {
                result.cancelled = true;
                break;
            }

            let (owner, nft_count) = match self.nft_count(entry).await {
                Ok(read) => read,
                Err(AuditError::Cancelled) => {
                    result.cancelled = true;
                    break;
                }
                Err(e) => {
                    result.failures.push(log_failure(entry, &e));
                    continue;
                }
            };
            result.total_nft = result.total_nft.saturating_add(nft_count);

            if nft_count.is_zero() {
                continue;
            }

            match self.read(self.reader.native_balance(owner)).await {
                Ok(native_balance) => {
                    info!(
                        wallet = entry.index,
                        address = %entry.address,
                        nft_count = %nft_count,
                        balance = %self.display(native_balance),
                        "NFT holder found"
                    );
                    result.holders.push((
                        entry.clone(),
                        Holdings {
                            native_balance,
                            nft_count,
                        },
                    ));
                }
                Err(AuditError::Cancelled) => {
                    result.cancelled = true;
                    break;
                }
                Err(e) => result.failures.push(log_failure(entry, &e)),
            }
        }

        result
    }

    /// Private keys of wallets holding at least one NFT.
    pub async fn keys_with_nft(&self, batch: &[WalletEntry]) -> KeySelection {
        let mut selection = KeySelection::default();

        for entry in batch {
            if self.stop_requested() {
                selection.cancelled = true;
                break;
            }

            match self.nft_count(entry).await {
                Ok((_, count)) if !count.is_zero() => {
                    info!(wallet = entry.index, address = %entry.address, nft_count = %count, "Selected key");
                    selection.keys.push(entry.private_key.clone());
                }
                Ok(_) => {}
                Err(AuditError::Cancelled) => {
                    selection.cancelled = true;
                    break;
                }
                Err(e) => selection.failures.push(log_failure(entry, &e)),
            }
        }

        selection
    }

    /// Private keys of wallets without NFTs whose balance is strictly above `min_balance` wei.
    pub async fn keys_without_nft(&self, batch: &[WalletEntry], min_balance: U256) -> KeySelection {
        let mut selection = KeySelection::default();

        for entry in batch {
            if self.stop_requested() {
                selection.cancelled = true;
                break;
            }

            match self.inspect(entry).await {
                Ok(holdings) if holdings.nft_count.is_zero() && holdings.native_balance > min_balance => {
                    info!(
                        wallet = entry.index,
                        address = %entry.address,
                        balance = %self.display(holdings.native_balance),
                        "Selected key"
                    );
                    selection.keys.push(entry.private_key.clone());
                }
                Ok(_) => {}
                Err(AuditError::Cancelled) => {
                    selection.cancelled = true;
                    break;
                }
                Err(e) => selection.failures.push(log_failure(entry, &e)),
            }
        }

        selection
    }

    /// Verify the pair, then read the NFT count and the native balance.
    async fn inspect(&self, entry: &WalletEntry) -> Result<Holdings, AuditError> {
        let (owner, nft_count) = self.nft_count(entry).await?;
        let native_balance = self.read(self.reader.native_balance(owner)).await?;
        Ok(Holdings {
            native_balance,
            nft_count,
        })
    }

    /// Verify the pair, then read the NFT count.
    async fn nft_count(&self, entry: &WalletEntry) -> Result<(Address, U256), AuditError> {
        let owner = verify_pair(&entry.address, &entry.private_key)?;
        let count = self.read(self.reader.nft_balance(owner)).await?;
        Ok((owner, count))
    }

    /// Await a chain read unless shutdown fires first.
    ///
    /// A read that is already complete wins over a concurrent cancel.
    async fn read<T>(
        &self,
        request: impl Future<Output = Result<T, ChainError>>,
    ) -> Result<T, AuditError> {
        tokio::select! {
            biased;
            result = request => result.map_err(AuditError::from),
            _ = self.shutdown.cancelled() => {
                warn!("Chain read abandoned on shutdown");
                Err(AuditError::Cancelled)
            }
        }
    }

    fn stop_requested(&self) -> bool {
        if self.shutdown.is_cancelled() {
            warn!("Audit cancelled, returning partial results");
            return true;
        }
        false
    }

    fn display(&self, wei: U256) -> String {
        format!(
            "{} {}",
            format_amount(wei, self.network.native_decimals),
            self.network.native_symbol
        )
    }
}

fn log_failure(entry: &WalletEntry, error: &AuditError) -> WalletFailure {
    warn!(
        wallet = entry.index,
        address = %entry.address,
        error = %error,
        "Wallet skipped"
    );
    WalletFailure {
        index: entry.index,
        address: entry.address.clone(),
        error: error.to_string(),
    }
}
