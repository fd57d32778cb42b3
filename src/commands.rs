// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The five audit commands: load the batch, run the auditor, write the report.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::audit::{Auditor, WalletFailure};
use crate::blockchain::ChainReader;
use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::input::load_batch;
use crate::report::{
    render_balance_lines, render_full_report, render_keys, render_nft_holders, render_total, AuditRecord, BalanceJson,
    RecordPayload, ReportFormat, ReportWriter,
};

/// An audit over the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCommand {
    /// Address, key, balance and NFT count of every wallet
    FullReport,
    /// Sum of native balances
    TotalBalance,
    /// Wallets holding NFTs and the NFT total
    NftHolders,
    /// Keys of wallets holding NFTs
    KeysWithNft,
    /// Keys of wallets without NFTs above the balance threshold
    KeysWithoutNft,
}

impl AuditCommand {
    /// Whether the command starts from an empty output file.
    ///
    /// The total balance is appended to the previous report instead.
    pub fn resets_output(self) -> bool {
        !matches!(self, AuditCommand::TotalBalance)
    }
}

/// Configured auditor plus its output file.
pub struct Session<R> {
    auditor: Auditor<R>,
    config: AuditConfig,
    writer: ReportWriter,
}

impl<R: ChainReader> Session<R> {
    pub fn new(auditor: Auditor<R>, config: AuditConfig) -> Self {
        let writer = ReportWriter::new(&config.output_file, config.format);
        Self {
            auditor,
            config,
            writer,
        }
    }

    pub fn auditor(&self) -> &Auditor<R> {
        &self.auditor
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run one command, echoing the text report to `console`.
    ///
    /// Input files are re-read on every call.
    pub async fn run<W: Write>(&self, command: AuditCommand, console: &mut W) -> AuditResult<()> {
        tracing::info!(command = ?command, "Running audit command");

        if command.resets_output() {
            self.writer.reset()?;
        }

        let batch = load_batch(&self.config.wallet_file, &self.config.privates_file)?;
        let network = self.auditor.network().clone();
        let started_at = Utc::now();
        let output = self.writer.path().display().to_string();

        // Console-only lines printed ahead of the report text
        let mut console_lines = String::new();

        let (text, payload, failures, cancelled, saved) = match command {
            AuditCommand::FullReport => {
                let report = self.auditor.inspect_all(&batch).await;
                (
                    render_full_report(&report, &network),
                    RecordPayload::full_report(&report, &network),
                    report.failures(),
                    report.cancelled,
                    format!("Wallet information saved to {output}"),
                )
            }
            AuditCommand::TotalBalance => {
                let summary = self.auditor.total_balance(&batch).await;
                console_lines = render_balance_lines(&summary, &network);
                (
                    render_total(&summary, &network),
                    RecordPayload::total_balance(&summary, &network),
                    summary.failures,
                    summary.cancelled,
                    format!("Total balance appended to {output}"),
                )
            }
            AuditCommand::NftHolders => {
                let holders = self.auditor.nft_holders(&batch).await;
                let saved = if holders.holders.is_empty() {
                    format!("No NFT holders; total written to {output}")
                } else {
                    format!("NFT holder information saved to {output}")
                };
                (
                    render_nft_holders(&holders, &network),
                    RecordPayload::nft_holders(&holders, &network),
                    holders.failures,
                    holders.cancelled,
                    saved,
                )
            }
            AuditCommand::KeysWithNft => {
                let selection = self.auditor.keys_with_nft(&batch).await;
                (
                    render_keys(&selection, "No wallets holding NFTs found."),
                    RecordPayload::KeysWithNft {
                        keys: selection.keys,
                    },
                    selection.failures,
                    selection.cancelled,
                    format!("Private keys of wallets holding NFTs saved to {output}"),
                )
            }
            AuditCommand::KeysWithoutNft => {
                let threshold = format!(
                    "{} {}",
                    self.config.min_balance_display, network.native_symbol
                );
                let selection = self
                    .auditor
                    .keys_without_nft(&batch, self.config.min_balance)
                    .await;
                (
                    render_keys(
                        &selection,
                        &format!(
                            "No wallets without NFTs and with balance above {threshold} found."
                        ),
                    ),
                    RecordPayload::KeysWithoutNft {
                        min_balance: BalanceJson::new(self.config.min_balance, &network),
                        keys: selection.keys,
                    },
                    selection.failures,
                    selection.cancelled,
                    format!(
                        "Private keys of wallets without NFTs (balance > {threshold}) saved to {output}"
                    ),
                )
            }
        };

        let mut text = text;
        if cancelled {
            text.push_str("Audit interrupted: report is partial.\n");
        }

        let record = AuditRecord::new(
            started_at,
            &network,
            self.config.nft_contract.to_checksum(None),
            cancelled,
            payload,
            &failures,
        );
        self.writer.write_run(&text, &record)?;

        echo(console, &console_lines)?;
        echo(console, &text)?;
        echo_failures(console, &failures)?;
        echo(console, &format!("{saved}\n"))?;
        if self.writer.format() == ReportFormat::Json {
            tracing::debug!(run_id = %record.run_id, "Appended JSON record");
        }

        tracing::info!(
            command = ?command,
            wallets = batch.len(),
            failures = failures.len(),
            cancelled,
            "Audit command finished"
        );
        Ok(())
    }
}

pub(crate) fn echo<W: Write>(console: &mut W, text: &str) -> AuditResult<()> {
    console
        .write_all(text.as_bytes())
        .and_then(|_| console.flush())
        .map_err(|e| AuditError::io("<stdout>", e))
}

fn echo_failures<W: Write>(console: &mut W, failures: &[WalletFailure]) -> AuditResult<()> {
    for failure in failures {
        echo(
            console,
            &format!(
                "Error for wallet #{} ({}): {}\n",
                failure.index, failure.address, failure.error
            ),
        )?;
    }
    Ok(())
}
