// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use nft_wallet_audit::{
    audit::Auditor,
    blockchain::ChainClient,
    commands::{AuditCommand, Session},
    config::{AuditArgs, LOG_FORMAT_ENV},
    logging::{init_logging, LogFormat},
    menu::{run_menu, spawn_stdin_reader},
};

#[derive(Parser)]
#[command(name = "nft-wallet-audit")]
#[command(about = "Audit a batch of EVM wallets: key/address check, native balance, NFT holdings")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(flatten)]
    audit: AuditArgs,

    /// Command to run; the interactive menu when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Write address, private key, balance and NFT count of every wallet
    Report,
    /// Append the total native balance of all wallets to the report
    Total,
    /// List wallets holding NFTs and the total NFT count
    NftHolders,
    /// List private keys of wallets holding NFTs
    KeysWithNft,
    /// List private keys of wallets without NFTs whose balance exceeds --min-balance
    KeysWithoutNft,
    /// Interactive menu
    Menu,
}

impl Commands {
    fn audit_command(self) -> Option<AuditCommand> {
        match self {
            Commands::Report => Some(AuditCommand::FullReport),
            Commands::Total => Some(AuditCommand::TotalBalance),
            Commands::NftHolders => Some(AuditCommand::NftHolders),
            Commands::KeysWithNft => Some(AuditCommand::KeysWithNft),
            Commands::KeysWithoutNft => Some(AuditCommand::KeysWithoutNft),
            Commands::Menu => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    init_logging(cli.log_format, level).context("Failed to initialise logging")?;

    let config = cli.audit.into_config().context("Invalid configuration")?;

    // First Ctrl-C stops the batch and keeps partial results, the second exits
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if shutdown.is_cancelled() {
                    tracing::warn!("Second interrupt, exiting immediately");
                    std::process::exit(130);
                }
                tracing::warn!("Interrupt received, stopping the audit (press Ctrl-C again to exit)");
                shutdown.cancel();
            }
        });
    }

    let client = tokio::select! {
        client = ChainClient::connect(
            &config.rpc_urls,
            config.network.clone(),
            config.nft_contract,
            config.rpc_timeout,
        ) => client.context("Failed to connect to the RPC endpoint")?,
        _ = shutdown.cancelled() => {
            tracing::warn!("Interrupted before connecting");
            return Ok(());
        }
    };
    tracing::info!(
        rpc_url = client.rpc_url(),
        chain_id = client.remote_chain_id(),
        network = client.network().name,
        "Using RPC endpoint"
    );

    match client.get_block_number().await {
        Ok(block) => tracing::info!(block, "Chain head"),
        Err(e) => tracing::warn!(error = %e, "Could not read chain head"),
    }
    let collection = client.collection_info().await;
    tracing::info!(
        contract = %collection.contract_address,
        name = %collection.name,
        symbol = %collection.symbol,
        explorer = %config.network.address_url(&collection.contract_address),
        "Auditing NFT collection"
    );

    let network = client.network().clone();
    let auditor = Auditor::new(client, network, shutdown);
    let session = Session::new(auditor, config);
    let mut stdout = std::io::stdout();

    match cli.command.unwrap_or(Commands::Menu).audit_command() {
        Some(command) => session.run(command, &mut stdout).await?,
        None => run_menu(&session, spawn_stdin_reader(), &mut stdout).await?,
    }

    Ok(())
}
