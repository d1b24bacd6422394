// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! Failure kinds surfaced by the interface.
//!
//! Every failure is reported synchronously to the immediate caller with
//! enough structure to act on; nothing is retried or swallowed internally.

use alloy::primitives::{Address, B256, U256};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InterfaceError>;

/// Errors surfaced by the testnet interface.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Account index outside the configured pool. Local, never retryable.
    #[error("account index {index} out of range (pool holds {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Sender balance cannot cover value plus the provisioned fee.
    /// Amounts are in wei; checked before anything is broadcast.
    #[error("insufficient balance: required {required} wei, available {available} wei")]
    InsufficientFunds { required: U256, available: U256 },

    /// Token contract is not on the transfer whitelist.
    #[error("contract {0} is not in the token whitelist")]
    ContractNotWhitelisted(Address),

    /// The JSON-RPC endpoint could not be reached.
    #[error("chain endpoint unreachable: {0}")]
    EndpointUnreachable(String),

    /// The endpoint answered with something that could not be decoded.
    #[error("malformed RPC response: {0}")]
    MalformedResponse(String),

    /// A signed transaction was rejected between submission and
    /// confirmation. Distinct from [`InterfaceError::ReceiptTimeout`].
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// No receipt arrived within the caller's budget. Non-fatal: the
    /// transaction may still land, and the caller can re-poll.
    #[error("no receipt for {0} within the timeout")]
    ReceiptTimeout(B256),

    /// Endpoint configuration could not be loaded or persisted.
    #[error("config error: {0}")]
    Config(String),

    /// A decimal amount string could not be converted to base units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Local signing failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_reports_both_amounts() {
        let err = InterfaceError::InsufficientFunds {
            required: U256::from(1_500u64),
            available: U256::from(200u64),
        };
        let msg = err.to_string();
        assert!(msg.contains("1500"));
        assert!(msg.contains("200"));
    }

    #[test]
    fn index_error_reports_pool_size() {
        let err = InterfaceError::IndexOutOfRange { index: 12, count: 10 };
        assert_eq!(
            err.to_string(),
            "account index 12 out of range (pool holds 10)"
        );
    }
}
