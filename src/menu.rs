// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Interactive menu over the audit commands.
//!
//! Errors from a command (missing files, count mismatch, unwritable output)
//! are printed and the menu is shown again. End of input or a cancelled
//! session leaves the loop.
//!
//! Input arrives as lines on a channel. [`spawn_stdin_reader`] feeds it from
//! a detached thread, so a blocked stdin read never keeps the runtime from
//! shutting down.

use std::io::{BufRead, Write};

use tokio::sync::mpsc;

use crate::blockchain::ChainReader;
use crate::commands::{echo, AuditCommand, Session};
use crate::error::AuditResult;

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(AuditCommand),
    Exit,
}

impl MenuChoice {
    /// Parse the number typed at the prompt.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Run(AuditCommand::FullReport)),
            "2" => Some(MenuChoice::Run(AuditCommand::TotalBalance)),
            "3" => Some(MenuChoice::Run(AuditCommand::NftHolders)),
            "4" => Some(MenuChoice::Run(AuditCommand::KeysWithNft)),
            "5" => Some(MenuChoice::Run(AuditCommand::KeysWithoutNft)),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

fn menu_text(min_balance: &str, symbol: &str) -> String {
    format!(
        "\nChoose an action:\n\
         1. Full wallet report (address, private key, {symbol} balance, NFT count)\n\
         2. Total {symbol} balance across all wallets\n\
         3. Wallets holding NFTs and total NFT count\n\
         4. Private keys of wallets holding NFTs\n\
         5. Private keys of wallets without NFTs (balance > {min_balance} {symbol})\n\
         6. Exit\n\
         Enter action number (1-6): "
    )
}

/// Forward stdin lines to a channel from a dedicated thread.
///
/// The channel closes on end of input or a read error.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the menu until the user exits, input ends, or the session is cancelled.
pub async fn run_menu<R, W>(
    session: &Session<R>,
    mut input: mpsc::Receiver<String>,
    console: &mut W,
) -> AuditResult<()>
where
    R: ChainReader,
    W: Write,
{
    let shutdown = session.auditor().shutdown().clone();
    let symbol = session.auditor().network().native_symbol;
    let prompt = menu_text(&session.config().min_balance_display, symbol);

    loop {
        if shutdown.is_cancelled() {
            echo(console, "\nInterrupted.\n")?;
            return Ok(());
        }

        echo(console, &prompt)?;

        let line = tokio::select! {
            line = input.recv() => line,
            _ = shutdown.cancelled() => {
                echo(console, "\nInterrupted.\n")?;
                return Ok(());
            }
        };

        let Some(line) = line else {
            echo(console, "\nExiting.\n")?;
            return Ok(());
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Exit) => {
                echo(console, "Exiting.\n")?;
                return Ok(());
            }
            Some(MenuChoice::Run(command)) => {
                if let Err(e) = session.run(command, console).await {
                    tracing::warn!(command = ?command, error = %e, "Audit command failed");
                    echo(console, &format!("Error: {e}\n"))?;
                }
            }
            None => echo(
                console,
                "Invalid choice. Please enter 1, 2, 3, 4, 5 or 6.\n",
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::tests::*;
    use crate::commands::tests::{session, write_inputs};
    use crate::report::ReportFormat;
    use std::fs;
    use std::time::Duration;

    /// Channel preloaded with `lines`, closed afterwards.
    fn typed(lines: &[&str]) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            tx.try_send(line.to_string()).unwrap();
        }
        rx
    }

    #[test]
    fn parse_choices() {
        assert_eq!(
            MenuChoice::parse(" 1 "),
            Some(MenuChoice::Run(AuditCommand::FullReport))
        );
        assert_eq!(
            MenuChoice::parse("5"),
            Some(MenuChoice::Run(AuditCommand::KeysWithoutNft))
        );
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[tokio::test]
    async fn menu_runs_choices_until_exit() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), &sample_batch());
        let session = session(dir.path(), ReportFormat::Text);
        let mut console = Vec::new();

        run_menu(&session, typed(&["9", "4", "6", "1"]), &mut console)
            .await
            .unwrap();

        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("Invalid choice"));
        assert!(console.contains("Private keys of wallets holding NFTs saved to"));
        assert!(console.ends_with("Exiting.\n"));
        // Choice 1 came after exit and never ran
        assert!(!console.contains("Wallet information saved to"));

        let report = fs::read_to_string(dir.path().join("wallet_info.txt")).unwrap();
        assert_eq!(report, format!("{KEY_0}\n"));
    }

    #[tokio::test]
    async fn menu_reports_load_errors_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), ReportFormat::Text);
        let mut console = Vec::new();

        run_menu(&session, typed(&["2"]), &mut console).await.unwrap();

        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("Error: File"));
        assert!(console.contains("not found"));
        // End of input exits after the error
        assert!(console.ends_with("Exiting.\n"));
    }

    #[tokio::test]
    async fn menu_stops_on_cancel_while_waiting_for_input() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), ReportFormat::Text);
        let mut console = Vec::new();

        // Sender stays open: the menu is blocked on input when the token fires
        let (_tx, rx) = mpsc::channel::<String>(1);
        let shutdown = session.auditor().shutdown().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            shutdown.cancel();
        });

        tokio::time::timeout(Duration::from_secs(5), run_menu(&session, rx, &mut console))
            .await
            .expect("menu ignored cancellation")
            .unwrap();

        let console = String::from_utf8(console).unwrap();
        assert!(console.ends_with("Interrupted.\n"));
    }
}
