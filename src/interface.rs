// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! The public call surface consumed by the agent layer.

use std::path::Path;
use std::time::Duration;

use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::TransactionRequest,
};

use crate::accounts::{AccountRegistry, PrivateKeyHex};
use crate::client::{ChainClient, TxReceipt};
use crate::config::TestnetConfig;
use crate::erc20::{self, TokenWhitelist, WhitelistEntry};
use crate::error::{InterfaceError, Result};
use crate::tx::{self, NATIVE_DECIMALS, TOKEN_TRANSFER_GAS_LIMIT};

/// Account pool, chain session, and token whitelist behind one handle.
///
/// Operations for different senders may run concurrently. Operations for
/// the *same* sender must be serialized by the caller: each send fetches a
/// fresh nonce immediately before signing, so two concurrent sends from
/// one account can observe the same nonce and race.
pub struct EvmInterface {
    registry: AccountRegistry,
    client: ChainClient,
    whitelist: TokenWhitelist,
    chain_id: u64,
}

impl EvmInterface {
    /// Load the endpoint config from `config_path` and build the
    /// interface.
    ///
    /// When the config holds no accounts, a fresh pool is generated and
    /// the updated config is persisted back to the same file, keeping
    /// identities stable across restarts.
    pub fn new(config_path: impl AsRef<Path>, whitelist: Vec<WhitelistEntry>) -> Result<Self> {
        let path = config_path.as_ref();
        let mut config = TestnetConfig::load(path)?;
        let bootstrapped = config.private_keys.is_empty();

        let interface = Self::with_config(&mut config, whitelist)?;
        if bootstrapped {
            config.save(path)?;
        }
        Ok(interface)
    }

    /// Build the interface from an already-loaded config.
    ///
    /// Accounts bootstrapped into `config` are not persisted here; use
    /// [`EvmInterface::new`] for the file-backed path.
    pub fn with_config(
        config: &mut TestnetConfig,
        whitelist: Vec<WhitelistEntry>,
    ) -> Result<Self> {
        let registry = AccountRegistry::from_config(config)?;
        let client = ChainClient::new(&config.rpc_url())?;
        Ok(Self {
            registry,
            client,
            whitelist: TokenWhitelist::new(whitelist),
            chain_id: config.network_id,
        })
    }

    /// All pool addresses, in fixed load order.
    pub fn addresses(&self) -> Vec<Address> {
        self.registry.addresses()
    }

    /// Address of the pool account at `index`.
    pub fn address_at(&self, index: usize) -> Result<Address> {
        self.registry.address_at(index)
    }

    /// Hex private key of the pool account at `index`, wrapped for
    /// restricted exposure. Intended for the caller's own custody
    /// tooling; never sent over RPC and never logged.
    pub fn private_key_at(&self, index: usize) -> Result<PrivateKeyHex> {
        self.registry.private_key_at(index)
    }

    /// Native balance of `address` in wei.
    pub async fn get_native_balance(&self, address: Address) -> Result<U256> {
        self.client.get_balance(address).await
    }

    /// Native balance rendered for humans, e.g. `"1.5 ETH"`.
    pub async fn get_native_balance_display(&self, address: Address) -> Result<String> {
        let wei = self.client.get_balance(address).await?;
        Ok(format!("{} ETH", tx::format_amount(wei, NATIVE_DECIMALS)))
    }

    /// Transfer native currency from a pool account.
    ///
    /// Gas is estimated for the candidate transfer and provisioned with a
    /// 10% margin. The send is refused with
    /// [`InterfaceError::InsufficientFunds`] before anything is broadcast
    /// when the sender cannot cover value plus the provisioned fee.
    pub async fn send_native(
        &self,
        sender_index: usize,
        recipient: Address,
        value: U256,
    ) -> Result<B256> {
        let sender = self.registry.address_at(sender_index)?;

        let candidate = TransactionRequest::default()
            .from(sender)
            .to(recipient)
            .value(value);
        let estimate = self.client.estimate_gas(candidate).await?;
        let gas_limit = tx::apply_gas_margin(estimate);

        let gas_price = self.client.get_gas_price().await?;
        let fee = U256::from(gas_limit) * U256::from(gas_price);
        let required = value + fee;

        let available = self.client.get_balance(sender).await?;
        if available < required {
            return Err(InterfaceError::InsufficientFunds {
                required,
                available,
            });
        }

        let nonce = self.client.get_transaction_count(sender).await?;
        let signed = tx::sign_legacy(
            self.registry.signer_at(sender_index)?,
            recipient,
            value,
            Vec::new(),
            nonce,
            gas_limit,
            gas_price,
            self.chain_id,
        )?;

        let hash = self.client.submit_raw(&signed.raw).await?;
        tracing::info!(%sender, %recipient, %value, tx_hash = %hash, "native transfer submitted");
        Ok(hash)
    }

    /// Token balance of `holder` on `contract`, in the token's smallest
    /// unit.
    ///
    /// Reads are not gated by the whitelist; only transfers are.
    pub async fn get_token_balance(&self, contract: Address, holder: Address) -> Result<U256> {
        let call = TransactionRequest::default()
            .to(contract)
            .input(erc20::encode_balance_of(holder).into());
        let raw = self.client.call(call).await?;
        erc20::decode_balance(&raw)
    }

    /// Transfer whitelisted tokens from a pool account.
    ///
    /// The whitelist check happens before any encoding or network
    /// traffic. Token sends run under the fixed
    /// [`TOKEN_TRANSFER_GAS_LIMIT`] and, unlike native sends, perform no
    /// native-fee solvency pre-check: an underfunded sender surfaces as a
    /// rejected submission or a failed receipt from the node.
    pub async fn send_token(
        &self,
        contract: Address,
        sender_index: usize,
        recipient: Address,
        amount: U256,
    ) -> Result<B256> {
        if !self.whitelist.is_whitelisted(contract) {
            return Err(InterfaceError::ContractNotWhitelisted(contract));
        }

        let sender = self.registry.address_at(sender_index)?;
        let calldata = erc20::encode_transfer(recipient, amount);

        let gas_price = self.client.get_gas_price().await?;
        let nonce = self.client.get_transaction_count(sender).await?;
        let signed = tx::sign_legacy(
            self.registry.signer_at(sender_index)?,
            contract,
            U256::ZERO,
            calldata,
            nonce,
            TOKEN_TRANSFER_GAS_LIMIT,
            gas_price,
            self.chain_id,
        )?;

        let hash = self.client.submit_raw(&signed.raw).await?;
        tracing::info!(
            %sender,
            %recipient,
            token = %contract,
            %amount,
            tx_hash = %hash,
            "token transfer submitted"
        );
        Ok(hash)
    }

    /// Whitelist snapshot, in insertion order.
    pub fn whitelist(&self) -> &[WhitelistEntry] {
        self.whitelist.entries()
    }

    /// Block until `tx_hash` is mined or `timeout` elapses.
    pub async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<TxReceipt> {
        self.client.wait_for_receipt(tx_hash, timeout).await
    }

    /// The underlying chain client.
    pub fn client(&self) -> &ChainClient {
        &self.client
    }
}
