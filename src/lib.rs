// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! EVM Testnet Interface
//!
//! A fixed pool of key-controlled accounts with safe transfer primitives
//! against a local JSON-RPC chain node. Built to be driven by an agent or
//! automation layer rather than a user-facing CLI.
//!
//! ## Modules
//!
//! - `accounts` - the account pool and key custody
//! - `client` - thin JSON-RPC session (balances, nonces, gas, submission)
//! - `config` - JSON endpoint configuration, persisted across restarts
//! - `erc20` - token whitelist and the fixed two-call ERC-20 codec
//! - `interface` - the public call surface, one handle per process
//! - `tx` - transaction assembly, local signing, unit conversion
//!
//! ## Concurrency
//!
//! Every operation takes `&self`; the account pool and whitelist are
//! read-only after construction, so a single [`EvmInterface`] can be
//! shared across tasks. Nonces are fetched immediately before signing and
//! never cached: two concurrent sends from the *same* account can observe
//! the same nonce, so callers must serialize operations per sender. No
//! retries happen internally; a failed submission is surfaced and retry
//! policy belongs to the caller.

pub mod accounts;
pub mod client;
pub mod config;
pub mod erc20;
pub mod error;
pub mod interface;
pub mod tx;

pub use accounts::{AccountRegistry, PrivateKeyHex, DEFAULT_ACCOUNT_COUNT};
pub use client::{ChainClient, TxReceipt};
pub use config::TestnetConfig;
pub use erc20::{TokenWhitelist, WhitelistEntry};
pub use error::{InterfaceError, Result};
pub use interface::EvmInterface;
pub use tx::{format_amount, parse_amount, TOKEN_TRANSFER_GAS_LIMIT};
