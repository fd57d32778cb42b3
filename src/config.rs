// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Every setting can be given as a command-line flag or through the
//! environment. Flags win over environment variables, which win over the
//! defaults below.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUDIT_RPC_URLS` | Comma-separated RPC endpoints, tried in order | `https://soneium.drpc.org` |
//! | `AUDIT_RPC_TIMEOUT` | Seconds before a single RPC request is abandoned | `30` |
//! | `AUDIT_NFT_CONTRACT` | ERC-721 contract to count tokens of | `0x64eA…Ccfc` |
//! | `AUDIT_WALLET_FILE` | Addresses, one per line | `wallet.txt` |
//! | `AUDIT_PRIVATES_FILE` | Private keys, one per line | `privates.txt` |
//! | `AUDIT_OUTPUT_FILE` | Report output file | `wallet_info.txt` |
//! | `AUDIT_MIN_BALANCE` | Balance a no-NFT wallet must exceed to be exported | `0.0000031` |
//! | `AUDIT_FORMAT` | Output file format (`text` or `json`) | `text` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::blockchain::{
    parse_amount, NetworkConfig, DEFAULT_NFT_CONTRACT, DEFAULT_RPC_TIMEOUT, SONEIUM_MAINNET, SONEIUM_RPC_URL,
};
use crate::error::{AuditError, AuditResult};
use crate::report::ReportFormat;

/// Environment variable name for the RPC endpoint list.
pub const RPC_URLS_ENV: &str = "AUDIT_RPC_URLS";
/// Environment variable name for the per-request RPC timeout.
pub const RPC_TIMEOUT_ENV: &str = "AUDIT_RPC_TIMEOUT";
/// Environment variable name for the NFT contract address.
pub const NFT_CONTRACT_ENV: &str = "AUDIT_NFT_CONTRACT";
/// Environment variable name for the address file.
pub const WALLET_FILE_ENV: &str = "AUDIT_WALLET_FILE";
/// Environment variable name for the private key file.
pub const PRIVATES_FILE_ENV: &str = "AUDIT_PRIVATES_FILE";
/// Environment variable name for the report file.
pub const OUTPUT_FILE_ENV: &str = "AUDIT_OUTPUT_FILE";
/// Environment variable name for the export threshold.
pub const MIN_BALANCE_ENV: &str = "AUDIT_MIN_BALANCE";
/// Environment variable name for the output file format.
pub const FORMAT_ENV: &str = "AUDIT_FORMAT";
/// Environment variable name for the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_WALLET_FILE: &str = "wallet.txt";
pub const DEFAULT_PRIVATES_FILE: &str = "privates.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "wallet_info.txt";
/// Default export threshold, in ETH.
pub const DEFAULT_MIN_BALANCE: &str = "0.0000031";

/// Audit settings shared by all subcommands.
#[derive(Debug, Clone, clap::Args)]
pub struct AuditArgs {
    /// RPC endpoints, tried in order until one answers
    #[arg(
        long = "rpc-url",
        env = RPC_URLS_ENV,
        value_delimiter = ',',
        default_value = SONEIUM_RPC_URL,
        global = true
    )]
    pub rpc_urls: Vec<String>,

    /// Seconds before a single RPC request is abandoned [default: 30]
    #[arg(
        long,
        env = RPC_TIMEOUT_ENV,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub rpc_timeout: Option<u64>,

    /// NFT contract whose token counts are audited
    #[arg(long, env = NFT_CONTRACT_ENV, default_value = DEFAULT_NFT_CONTRACT, global = true)]
    pub nft_contract: String,

    /// File with one wallet address per line
    #[arg(long, env = WALLET_FILE_ENV, default_value = DEFAULT_WALLET_FILE, global = true)]
    pub wallet_file: PathBuf,

    /// File with one private key per line, same order as the address file
    #[arg(long, env = PRIVATES_FILE_ENV, default_value = DEFAULT_PRIVATES_FILE, global = true)]
    pub privates_file: PathBuf,

    /// Report output file
    #[arg(short, long, env = OUTPUT_FILE_ENV, default_value = DEFAULT_OUTPUT_FILE, global = true)]
    pub output: PathBuf,

    /// Native balance (decimal, e.g. 0.0000031) a wallet without NFTs must exceed
    #[arg(long, env = MIN_BALANCE_ENV, default_value = DEFAULT_MIN_BALANCE, global = true)]
    pub min_balance: String,

    /// Output file format
    #[arg(long, env = FORMAT_ENV, value_enum, default_value = "text", global = true)]
    pub format: ReportFormat,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub network: NetworkConfig,
    pub rpc_urls: Vec<String>,
    pub rpc_timeout: Duration,
    pub nft_contract: Address,
    pub wallet_file: PathBuf,
    pub privates_file: PathBuf,
    pub output_file: PathBuf,
    /// Export threshold in wei
    pub min_balance: U256,
    /// Export threshold as given, for messages
    pub min_balance_display: String,
    pub format: ReportFormat,
}

impl AuditArgs {
    /// Validate the raw settings.
    pub fn into_config(self) -> AuditResult<AuditConfig> {
        let network = SONEIUM_MAINNET;

        let rpc_urls: Vec<String> = self
            .rpc_urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        let nft_contract = self
            .nft_contract
            .trim()
            .parse::<Address>()
            .map_err(|e| AuditError::InvalidAddress(format!("{}: {e}", self.nft_contract)))?;

        let min_balance = parse_amount(&self.min_balance, network.native_decimals)?;

        let rpc_timeout = self
            .rpc_timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RPC_TIMEOUT);

        Ok(AuditConfig {
            network,
            rpc_urls,
            rpc_timeout,
            nft_contract,
            wallet_file: self.wallet_file,
            privates_file: self.privates_file,
            output_file: self.output,
            min_balance,
            min_balance_display: self.min_balance.trim().to_string(),
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: AuditArgs,
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = TestCli::try_parse_from(["audit"]).unwrap();
        let config = cli.args.into_config().unwrap();

        assert_eq!(config.rpc_urls, vec![SONEIUM_RPC_URL.to_string()]);
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert_eq!(config.nft_contract, DEFAULT_NFT_CONTRACT.parse::<Address>().unwrap());
        assert_eq!(config.wallet_file, PathBuf::from("wallet.txt"));
        assert_eq!(config.privates_file, PathBuf::from("privates.txt"));
        assert_eq!(config.output_file, PathBuf::from("wallet_info.txt"));
        assert_eq!(config.min_balance, U256::from(3_100_000_000_000u64));
        assert_eq!(config.format, ReportFormat::Text);
    }

    #[test]
    fn rpc_urls_split_on_commas() {
        let cli = TestCli::try_parse_from([
            "audit",
            "--rpc-url",
            "https://a.example, https://b.example,",
        ])
        .unwrap();
        let config = cli.args.into_config().unwrap();
        assert_eq!(
            config.rpc_urls,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let cli = TestCli::try_parse_from(["audit", "--min-balance", "abc"]).unwrap();
        assert!(matches!(
            cli.args.into_config(),
            Err(AuditError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn invalid_contract_is_rejected() {
        let cli = TestCli::try_parse_from(["audit", "--nft-contract", "0x12"]).unwrap();
        assert!(matches!(
            cli.args.into_config(),
            Err(AuditError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rpc_timeout_in_seconds() {
        let cli = TestCli::try_parse_from(["audit", "--rpc-timeout", "5"]).unwrap();
        assert_eq!(cli.args.into_config().unwrap().rpc_timeout, Duration::from_secs(5));

        assert!(TestCli::try_parse_from(["audit", "--rpc-timeout", "0"]).is_err());
    }
}
