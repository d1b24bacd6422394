// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! Token whitelist and the fixed ERC-20 call codec.
//!
//! The interface description is deliberately minimal: a balance read and a
//! transfer, nothing else. Only those two calls are encodable through this
//! module, and only transfers are gated by the whitelist; balance reads
//! are open, for whitelisted and unlisted contracts alike.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};

use crate::error::{InterfaceError, Result};

// The two token calls this interface is permitted to make.
sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Metadata for one whitelisted token contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Token contract address
    pub address: Address,
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Number of decimals
    pub decimals: u8,
}

/// The allow-list of token contracts this interface may move funds for.
///
/// Read-only after construction; injected rather than global.
#[derive(Debug, Clone, Default)]
pub struct TokenWhitelist {
    entries: Vec<WhitelistEntry>,
}

impl TokenWhitelist {
    /// Build the whitelist, keeping the first entry for any duplicated
    /// contract address.
    pub fn new(entries: Vec<WhitelistEntry>) -> Self {
        let mut seen: Vec<Address> = Vec::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if seen.contains(&entry.address) {
                tracing::warn!(
                    address = %entry.address,
                    symbol = %entry.symbol,
                    "duplicate whitelist entry dropped"
                );
                continue;
            }
            seen.push(entry.address);
            kept.push(entry);
        }
        Self { entries: kept }
    }

    /// Whether `contract` may be used for token transfers.
    pub fn is_whitelisted(&self, contract: Address) -> bool {
        self.entries.iter().any(|e| e.address == contract)
    }

    /// Entry for `contract`, if whitelisted.
    pub fn get(&self, contract: Address) -> Option<&WhitelistEntry> {
        self.entries.iter().find(|e| e.address == contract)
    }

    /// Read-only snapshot, in insertion order.
    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }
}

/// Encode a `transfer(to, amount)` call.
pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    IERC20::transferCall { to, amount }.abi_encode()
}

/// Encode a `balanceOf(account)` call.
pub fn encode_balance_of(account: Address) -> Vec<u8> {
    IERC20::balanceOfCall { account }.abi_encode()
}

/// Decode the single integer returned by `balanceOf`.
pub fn decode_balance(raw: &[u8]) -> Result<U256> {
    IERC20::balanceOfCall::abi_decode_returns(raw)
        .map_err(|e| InterfaceError::MalformedResponse(format!("balanceOf return: {e}")))
}
