// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! Thin JSON-RPC session to the testnet node.
//!
//! Stateless: every query hits the node, nothing is cached. Nonces in
//! particular are fetched fresh on each call so concurrent senders never
//! see stale values from this layer.

use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, B256, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    transports::{RpcError, TransportErrorKind},
};

use crate::error::{InterfaceError, Result};

/// HTTP provider type for the testnet endpoint (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Interval between receipt polls in [`ChainClient::wait_for_receipt`].
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Receipt for a mined transaction.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: B256,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction succeeded
    pub success: bool,
    /// Address of a contract created by the transaction, if any
    pub contract_address: Option<Address>,
}

/// JSON-RPC client for the local node. Safe for concurrent use across
/// different senders.
#[derive(Debug)]
pub struct ChainClient {
    provider: HttpProvider,
    rpc_url: String,
}

impl ChainClient {
    /// Connect to a JSON-RPC endpoint over HTTP.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| InterfaceError::Config(format!("invalid RPC URL: {e}")))?;

        let provider = ProviderBuilder::new().connect_http(url);
        tracing::info!(endpoint = rpc_url, "chain client ready");

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Native balance of `address` in wei.
    pub async fn get_balance(&self, address: Address) -> Result<U256> {
        self.provider.get_balance(address).await.map_err(query_error)
    }

    /// Next nonce for `address`, queried fresh on every call.
    pub async fn get_transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(query_error)
    }

    /// Current gas price in wei.
    pub async fn get_gas_price(&self) -> Result<u128> {
        self.provider.get_gas_price().await.map_err(query_error)
    }

    /// Gas units the node expects `tx` to consume.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64> {
        self.provider.estimate_gas(tx).await.map_err(query_error)
    }

    /// Read-only contract call.
    pub async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        self.provider.call(tx).await.map_err(query_error)
    }

    /// Broadcast signed transaction bytes and return the hash.
    pub async fn submit_raw(&self, raw: &[u8]) -> Result<B256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(submit_error)?;
        Ok(*pending.tx_hash())
    }

    /// Receipt for `tx_hash`, or `None` while it is still pending.
    pub async fn get_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(query_error)?;

        Ok(receipt.map(|r| TxReceipt {
            tx_hash,
            block_number: r.block_number.unwrap_or(0),
            gas_used: r.gas_used as u64,
            success: r.status(),
            contract_address: r.contract_address,
        }))
    }

    /// Block until `tx_hash` is mined or `timeout` elapses.
    ///
    /// A timeout does not fail the transaction itself: it may still land
    /// later, and callers can re-poll via [`ChainClient::get_receipt`].
    pub async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<TxReceipt> {
        let poll = async {
            loop {
                if let Some(receipt) = self.get_receipt(tx_hash).await? {
                    return Ok(receipt);
                }
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(InterfaceError::ReceiptTimeout(tx_hash)),
        }
    }

    /// The endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// Transport failures map to `EndpointUnreachable`; anything else a query
/// cannot make sense of maps to `MalformedResponse`.
fn query_error(err: RpcError<TransportErrorKind>) -> InterfaceError {
    match err {
        RpcError::Transport(kind) => InterfaceError::EndpointUnreachable(kind.to_string()),
        other => InterfaceError::MalformedResponse(other.to_string()),
    }
}

/// Post-signing rejections are submission errors, not query errors.
fn submit_error(err: RpcError<TransportErrorKind>) -> InterfaceError {
    match err {
        RpcError::Transport(kind) => InterfaceError::EndpointUnreachable(kind.to_string()),
        other => InterfaceError::SubmissionFailed(other.to_string()),
    }
}
