// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT Wallet Audit - batch reporting over EVM wallets
//!
//! For each (address, private key) pair of a batch, the key is checked
//! against the address, then the native balance and the token count of one
//! ERC-721 collection are read over JSON-RPC. Results are written as text or
//! JSONL reports. Nothing is signed or broadcast.
//!
//! ## Modules
//!
//! - `audit` - Sequential batch operations and their results
//! - `blockchain` - Key derivation, RPC client, ERC-721 calls, units
//! - `commands` - The five audit commands and their report output
//! - `config` - CLI/environment configuration
//! - `input` - Address and key file loading
//! - `menu` - Interactive menu
//! - `report` - Text and JSON rendering, output file

pub mod audit;
pub mod blockchain;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod menu;
pub mod report;
