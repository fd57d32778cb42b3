// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;

use crate::blockchain::{AmountError, ChainError};

/// Errors raised while loading, auditing, or reporting a wallet batch.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("File {0} not found")]
    FileNotFound(PathBuf),

    #[error("File {0} is empty")]
    EmptyFile(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Number of addresses ({wallets}) does not match number of private keys ({keys})")]
    CountMismatch { wallets: usize, keys: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Private key does not match address {address}. Expected address: {derived}")]
    KeyMismatch { address: String, derived: String },

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("Invalid minimum balance: {0}")]
    InvalidThreshold(#[from] AmountError),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit cancelled")]
    Cancelled,
}

impl AuditError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AuditError::FileNotFound(path)
        } else {
            AuditError::Io { path, source }
        }
    }
}

pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_file_not_found() {
        let err = AuditError::io(
            "wallet.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, AuditError::FileNotFound(_)));
        assert_eq!(err.to_string(), "File wallet.txt not found");
    }

    #[test]
    fn io_other_keeps_source() {
        let err = AuditError::io(
            "out.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, AuditError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn mismatch_message_names_both_addresses() {
        let err = AuditError::KeyMismatch {
            address: "0xaaa".to_string(),
            derived: "0xbbb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Private key does not match address 0xaaa. Expected address: 0xbbb"
        );
    }

    #[test]
    fn cancelled_message() {
        assert_eq!(AuditError::Cancelled.to_string(), "Audit cancelled");
    }

    #[test]
    fn chain_errors_are_transparent() {
        let err: AuditError = ChainError::RpcError("timeout".to_string()).into();
        assert_eq!(err.to_string(), "RPC error: timeout");
    }
}
