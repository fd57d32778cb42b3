// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Loading of the wallet batch from the address and private key files.
//!
//! Both files hold one entry per line. Line `i` of the address file pairs
//! with line `i` of the key file once blank lines are dropped.

use std::fs;
use std::path::Path;

use crate::error::{AuditError, AuditResult};

/// One (address, private key) pair of the batch, as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletEntry {
    /// 1-based position in the input files
    pub index: usize,
    pub address: String,
    pub private_key: String,
}

/// Read a line-oriented input file, trimming lines and skipping blank ones.
pub fn load_lines(path: &Path) -> AuditResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;

    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(AuditError::EmptyFile(path.to_path_buf()));
    }

    tracing::info!(path = %path.display(), count = lines.len(), "Loaded input file");
    Ok(lines)
}

/// Load and pair the address and key files.
pub fn load_batch(wallet_path: &Path, key_path: &Path) -> AuditResult<Vec<WalletEntry>> {
    let addresses = load_lines(wallet_path)?;
    let keys = load_lines(key_path)?;

    if addresses.len() != keys.len() {
        return Err(AuditError::CountMismatch {
            wallets: addresses.len(),
            keys: keys.len(),
        });
    }

    Ok(addresses
        .into_iter()
        .zip(keys)
        .enumerate()
        .map(|(i, (address, private_key))| WalletEntry {
            index: i + 1,
            address,
            private_key,
        })
        .collect())
}
