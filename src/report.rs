// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Report rendering and the output file.
//!
//! Two formats are written to the output file:
//!
//! - `text`: the human-readable sections below, one block per wallet
//!   followed by a 50-dash separator.
//! - `json`: one [`AuditRecord`] per run, appended as a JSONL line.
//!
//! The console always receives the text rendering.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audit::{BalanceSummary, FullReport, Holdings, KeySelection, NftHolders, WalletFailure};
use crate::blockchain::{format_amount, NetworkConfig};
use crate::error::{AuditError, AuditResult};
use crate::input::WalletEntry;

/// Separator printed after each wallet block.
pub fn separator() -> String {
    "-".repeat(50)
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

/// Writer for the report output file.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(path: impl AsRef<Path>, format: ReportFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Remove a previous report, if any.
    pub fn reset(&self) -> AuditResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed previous report");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuditError::io(&self.path, e)),
        }
    }

    /// Append raw text to the output file, creating it if needed.
    pub fn append(&self, text: &str) -> AuditResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AuditError::io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| AuditError::io(&self.path, e))
    }

    /// Append one run record as a JSON line.
    pub fn append_record(&self, record: &AuditRecord) -> AuditResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.append(&line)
    }

    /// Write a run in the configured format: `text` for [`ReportFormat::Text`],
    /// `record` for [`ReportFormat::Json`].
    pub fn write_run(&self, text: &str, record: &AuditRecord) -> AuditResult<()> {
        match self.format {
            ReportFormat::Text => self.append(text),
            ReportFormat::Json => self.append_record(record),
        }
    }
}

// =============================================================================
// Text rendering
// =============================================================================

fn amount(wei: U256, network: &NetworkConfig) -> String {
    format!(
        "{} {}",
        format_amount(wei, network.native_decimals),
        network.native_symbol
    )
}

fn holdings_block(entry: &WalletEntry, holdings: &Holdings, network: &NetworkConfig) -> String {
    format!(
        "Address: {}\nPrivate key: {}\n{} balance: {}\nNFT count: {}\n{}\n",
        entry.address,
        entry.private_key,
        network.native_symbol,
        amount(holdings.native_balance, network),
        holdings.nft_count,
        separator()
    )
}

/// One block per wallet, numbered, failures included.
pub fn render_full_report(report: &FullReport, network: &NetworkConfig) -> String {
    let mut out = String::new();
    for wallet in &report.wallets {
        match &wallet.outcome {
            Ok(holdings) => {
                out.push_str(&format!("Wallet #{}:\n", wallet.entry.index));
                out.push_str(&holdings_block(&wallet.entry, holdings, network));
            }
            Err(error) => out.push_str(&format!(
                "Wallet #{}: error for address {}: {}\n{}\n",
                wallet.entry.index,
                wallet.entry.address,
                error,
                separator()
            )),
        }
    }
    out
}

/// Per-wallet balance lines shown on the console; the file keeps only the total.
pub fn render_balance_lines(summary: &BalanceSummary, network: &NetworkConfig) -> String {
    summary
        .balances
        .iter()
        .map(|(entry, balance)| format!("Wallet {}: {}\n", entry.address, amount(*balance, network)))
        .collect()
}

/// Single total line.
pub fn render_total(summary: &BalanceSummary, network: &NetworkConfig) -> String {
    format!(
        "Total {} balance: {}\n",
        network.native_symbol,
        amount(summary.total, network)
    )
}

/// Holder blocks followed by the NFT total.
pub fn render_nft_holders(holders: &NftHolders, network: &NetworkConfig) -> String {
    let mut out = String::new();
    if holders.holders.is_empty() {
        out.push_str("No wallets holding NFTs found.\n");
    }
    for (entry, holdings) in &holders.holders {
        out.push_str(&holdings_block(entry, holdings, network));
    }
    out.push_str(&format!(
        "Total NFT count across all wallets: {}\n",
        holders.total_nft
    ));
    out
}

/// Keys one per line, or `empty_message` when nothing was selected.
pub fn render_keys(selection: &KeySelection, empty_message: &str) -> String {
    if selection.keys.is_empty() {
        format!("{empty_message}\n")
    } else {
        let mut out = selection.keys.join("\n");
        out.push('\n');
        out
    }
}

// =============================================================================
// JSON records
// =============================================================================

/// Balance rendered both raw and formatted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BalanceJson {
    /// Balance in wei
    pub balance_raw: String,
    /// Balance formatted with decimals
    pub balance_formatted: String,
}

impl BalanceJson {
    pub fn new(wei: U256, network: &NetworkConfig) -> Self {
        Self {
            balance_raw: wei.to_string(),
            balance_formatted: format_amount(wei, network.native_decimals),
        }
    }
}

/// One wallet in a JSON record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WalletJson {
    pub index: usize,
    pub address: String,
    pub private_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_balance: Option<BalanceJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WalletJson {
    fn from_holdings(entry: &WalletEntry, holdings: &Holdings, network: &NetworkConfig) -> Self {
        Self {
            index: entry.index,
            address: entry.address.clone(),
            private_key: entry.private_key.clone(),
            native_balance: Some(BalanceJson::new(holdings.native_balance, network)),
            nft_count: Some(holdings.nft_count.to_string()),
            error: None,
        }
    }
}

/// Command-specific part of a record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    FullReport {
        wallets: Vec<WalletJson>,
    },
    TotalBalance {
        total: BalanceJson,
        wallets: Vec<WalletJson>,
    },
    NftHolders {
        holders: Vec<WalletJson>,
        total_nft: String,
    },
    KeysWithNft {
        keys: Vec<String>,
    },
    KeysWithoutNft {
        min_balance: BalanceJson,
        keys: Vec<String>,
    },
}

impl RecordPayload {
    pub fn full_report(report: &FullReport, network: &NetworkConfig) -> Self {
        let wallets = report
            .wallets
            .iter()
            .map(|w| match &w.outcome {
                Ok(holdings) => WalletJson::from_holdings(&w.entry, holdings, network),
                Err(error) => WalletJson {
                    index: w.entry.index,
                    address: w.entry.address.clone(),
                    private_key: w.entry.private_key.clone(),
                    native_balance: None,
                    nft_count: None,
                    error: Some(error.clone()),
                },
            })
            .collect();
        RecordPayload::FullReport { wallets }
    }

    pub fn total_balance(summary: &BalanceSummary, network: &NetworkConfig) -> Self {
        let wallets = summary
            .balances
            .iter()
            .map(|(entry, wei)| WalletJson {
                index: entry.index,
                address: entry.address.clone(),
                private_key: entry.private_key.clone(),
                native_balance: Some(BalanceJson::new(*wei, network)),
                nft_count: None,
                error: None,
            })
            .collect();
        RecordPayload::TotalBalance {
            total: BalanceJson::new(summary.total, network),
            wallets,
        }
    }

    pub fn nft_holders(holders: &NftHolders, network: &NetworkConfig) -> Self {
        RecordPayload::NftHolders {
            holders: holders
                .holders
                .iter()
                .map(|(entry, holdings)| WalletJson::from_holdings(entry, holdings, network))
                .collect(),
            total_nft: holders.total_nft.to_string(),
        }
    }
}

/// A skipped wallet in a JSON record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailureJson {
    pub index: usize,
    pub address: String,
    pub error: String,
}

impl From<&WalletFailure> for FailureJson {
    fn from(f: &WalletFailure) -> Self {
        Self {
            index: f.index,
            address: f.address.clone(),
            error: f.error.clone(),
        }
    }
}

/// One audit run, as appended to the JSONL output.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Unique run ID.
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub network: String,
    pub chain_id: u64,
    pub nft_contract: String,
    /// Whether the run was interrupted before the end of the batch.
    pub cancelled: bool,
    pub result: RecordPayload,
    pub failures: Vec<FailureJson>,
}

impl AuditRecord {
    pub fn new(
        started_at: DateTime<Utc>,
        network: &NetworkConfig,
        nft_contract: impl Into<String>,
        cancelled: bool,
        result: RecordPayload,
        failures: &[WalletFailure],
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            finished_at: Utc::now(),
            network: network.name.to_string(),
            chain_id: network.chain_id,
            nft_contract: nft_contract.into(),
            cancelled,
            result,
            failures: failures.iter().map(FailureJson::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::WalletReport;
    use crate::blockchain::SONEIUM_MAINNET;

    fn entry(index: usize) -> WalletEntry {
        WalletEntry {
            index,
            address: format!("0x{index:040x}"),
            private_key: format!("key{index}"),
        }
    }

    fn holdings(wei: u64, nfts: u64) -> Holdings {
        Holdings {
            native_balance: U256::from(wei),
            nft_count: U256::from(nfts),
        }
    }

    #[test]
    fn full_report_renders_blocks_and_failures() {
        let report = FullReport {
            wallets: vec![
                WalletReport {
                    entry: entry(1),
                    outcome: Ok(holdings(1_500_000_000_000_000_000, 2)),
                },
                WalletReport {
                    entry: entry(2),
                    outcome: Err("RPC error: timeout".to_string()),
                },
            ],
            cancelled: false,
        };

        let text = render_full_report(&report, &SONEIUM_MAINNET);
        let sep = separator();
        let expected = format!(
            "Wallet #1:\nAddress: {}\nPrivate key: key1\nETH balance: 1.5 ETH\nNFT count: 2\n{sep}\n\
             Wallet #2: error for address {}: RPC error: timeout\n{sep}\n",
            entry(1).address,
            entry(2).address,
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn total_renders_exact_amount() {
        let summary = BalanceSummary {
            total: U256::from(3_100_000_000_000u64),
            ..Default::default()
        };
        assert_eq!(
            render_total(&summary, &SONEIUM_MAINNET),
            "Total ETH balance: 0.0000031 ETH\n"
        );
    }

    #[test]
    fn balance_lines_list_each_wallet() {
        let summary = BalanceSummary {
            balances: vec![
                (entry(1), U256::from(1_500_000_000_000_000_000u64)),
                (entry(2), U256::ZERO),
            ],
            ..Default::default()
        };
        assert_eq!(
            render_balance_lines(&summary, &SONEIUM_MAINNET),
            format!(
                "Wallet {}: 1.5 ETH\nWallet {}: 0 ETH\n",
                entry(1).address,
                entry(2).address
            )
        );
    }

    #[test]
    fn nft_holders_without_holders() {
        let holders = NftHolders::default();
        assert_eq!(
            render_nft_holders(&holders, &SONEIUM_MAINNET),
            "No wallets holding NFTs found.\nTotal NFT count across all wallets: 0\n"
        );
    }

    #[test]
    fn nft_holders_with_holders_ends_with_total() {
        let holders = NftHolders {
            holders: vec![(entry(3), holdings(0, 4))],
            total_nft: U256::from(4),
            ..Default::default()
        };
        let text = render_nft_holders(&holders, &SONEIUM_MAINNET);
        assert!(text.starts_with("Address: "));
        assert!(!text.contains("Wallet #"));
        assert!(text.contains("NFT count: 4\n"));
        assert!(text.ends_with("Total NFT count across all wallets: 4\n"));
    }

    #[test]
    fn keys_render_one_per_line() {
        let selection = KeySelection {
            keys: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert_eq!(render_keys(&selection, "none"), "a\nb\n");
        assert_eq!(render_keys(&KeySelection::default(), "none"), "none\n");
    }

    #[test]
    fn writer_reset_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("out.txt"), ReportFormat::Text);

        // Resetting a missing file is fine
        writer.reset().unwrap();
        writer.append("one\n").unwrap();
        writer.append("two\n").unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "one\ntwo\n");

        writer.reset().unwrap();
        assert!(!writer.path().exists());
    }

    #[test]
    fn json_record_is_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("out.jsonl"), ReportFormat::Json);

        let summary = BalanceSummary {
            balances: vec![(entry(1), U256::from(2_000_000_000_000_000_000u64))],
            total: U256::from(2_000_000_000_000_000_000u64),
            failures: vec![WalletFailure {
                index: 2,
                address: "0xdead".to_string(),
                error: "boom".to_string(),
            }],
            cancelled: false,
        };
        let record = AuditRecord::new(
            Utc::now(),
            &SONEIUM_MAINNET,
            "0xcontract",
            summary.cancelled,
            RecordPayload::total_balance(&summary, &SONEIUM_MAINNET),
            &summary.failures,
        );
        writer.write_run("ignored", &record).unwrap();
        writer.write_run("ignored", &record).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["chain_id"], 1868);
        assert_eq!(value["result"]["kind"], "total_balance");
        assert_eq!(value["result"]["total"]["balance_formatted"], "2");
        assert_eq!(value["result"]["total"]["balance_raw"], "2000000000000000000");
        assert_eq!(value["failures"][0]["error"], "boom");
        assert_ne!(
            serde_json::from_str::<serde_json::Value>(lines[1]).unwrap()["run_id"],
            value["run_id"]
        );
    }
}
