// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! Transaction assembly, local signing, and unit conversion.
//!
//! Transactions are legacy (gas-price) style, matching what the local
//! node expects. A request is assembled fresh for every send and consumed
//! immediately by signing; nothing unsigned is ever handed out.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSignerSync,
    primitives::{Address, Bytes, TxKind, B256, U256},
    signers::local::PrivateKeySigner,
};

use crate::error::{InterfaceError, Result};

/// Fixed gas budget for whitelisted token transfers.
pub const TOKEN_TRANSFER_GAS_LIMIT: u64 = 100_000;

/// Decimals of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// A locally signed transaction ready for broadcast.
pub struct SignedTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw: Vec<u8>,
    /// Transaction hash.
    pub hash: B256,
}

/// Apply the 10% provisioning margin to a gas estimate, rounding toward
/// the larger integer.
pub fn apply_gas_margin(estimate: u64) -> u64 {
    estimate.saturating_mul(11).div_ceil(10)
}

/// Assemble and sign a legacy transaction.
///
/// `input` carries token calldata; native transfers leave it empty.
#[allow(clippy::too_many_arguments)]
pub fn sign_legacy(
    signer: &PrivateKeySigner,
    to: Address,
    value: U256,
    input: Vec<u8>,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    chain_id: u64,
) -> Result<SignedTransaction> {
    let mut tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price,
        gas_limit,
        to: TxKind::Call(to),
        value,
        input: Bytes::from(input),
    };

    let signature = signer
        .sign_transaction_sync(&mut tx)
        .map_err(|e| InterfaceError::Signing(e.to_string()))?;
    let envelope = TxEnvelope::from(tx.into_signed(signature));

    Ok(SignedTransaction {
        raw: envelope.encoded_2718(),
        hash: *envelope.tx_hash(),
    })
}

/// Convert a decimal string such as `"1.5"` to the token's smallest unit.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() || frac.contains('.') {
        return Err(InterfaceError::InvalidAmount(amount.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(InterfaceError::InvalidAmount(format!(
            "`{amount}` has more than {decimals} decimal places"
        )));
    }

    let whole: u128 = whole
        .parse()
        .map_err(|_| InterfaceError::InvalidAmount(amount.to_string()))?;
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<width$}", width = decimals as usize)
            .parse()
            .map_err(|_| InterfaceError::InvalidAmount(amount.to_string()))?
    };

    let scale = 10u128.pow(decimals as u32);
    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .map(U256::from)
        .ok_or_else(|| InterfaceError::InvalidAmount(format!("`{amount}` overflows")))
}

/// Render a smallest-unit amount as a decimal string, trimming trailing
/// zeros.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }
    let digits = remainder.to_string();
    let mut frac = "0".repeat(decimals as usize - digits.len());
    frac.push_str(&digits);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
