// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for the audited EVM chain.
//!
//! This module provides functionality for:
//! - Deriving addresses from private keys
//! - Querying native balances
//! - Querying ERC-721 holdings of one collection

pub mod client;
pub mod erc721;
pub mod keys;
pub mod types;
pub mod units;

pub use client::{ChainClient, ChainError, ChainReader, DEFAULT_RPC_TIMEOUT};
pub use keys::{derive_address, parse_private_key, verify_pair};
pub use types::*;
pub use units::{format_amount, parse_amount, AmountError};
