// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! The fixed pool of key-controlled accounts.
//!
//! Keys live only inside [`AccountRegistry`]; signing happens in-process
//! and key material never crosses the RPC boundary.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::TestnetConfig;
use crate::error::{InterfaceError, Result};

/// Number of keypairs generated when the config holds none.
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// A hex-encoded private key handed out by
/// [`AccountRegistry::private_key_at`].
///
/// `Debug` is redacted and the buffer is zeroized on drop; the value is
/// only readable through [`PrivateKeyHex::expose`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyHex(String);

impl PrivateKeyHex {
    /// The 0x-prefixed hex key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKeyHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKeyHex(<redacted>)")
    }
}

#[derive(Debug)]
struct Account {
    address: Address,
    signer: PrivateKeySigner,
}

/// Ordered, immutable pool of (address, key) pairs.
///
/// Built once from [`TestnetConfig`] and read-only afterwards, so shared
/// references are safe across tasks.
#[derive(Debug)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Build the registry from the endpoint configuration.
    ///
    /// Configured keys are parsed and each derived address is checked
    /// against the stored one. When the config holds no keys, a fresh pool
    /// of [`DEFAULT_ACCOUNT_COUNT`] keypairs is generated and written back
    /// into `config`; persisting the updated file is the caller's job.
    pub fn from_config(config: &mut TestnetConfig) -> Result<Self> {
        if config.private_keys.is_empty() {
            Self::bootstrap(config, DEFAULT_ACCOUNT_COUNT);
        }
        if config.private_keys.len() != config.addresses.len() {
            return Err(InterfaceError::Config(format!(
                "{} private keys but {} addresses",
                config.private_keys.len(),
                config.addresses.len()
            )));
        }

        let mut accounts = Vec::with_capacity(config.private_keys.len());
        for (i, (key_hex, addr_hex)) in
            config.private_keys.iter().zip(&config.addresses).enumerate()
        {
            let signer: PrivateKeySigner = key_hex
                .trim_start_matches("0x")
                .parse()
                .map_err(|e| InterfaceError::Config(format!("private key {i}: {e}")))?;
            let stored: Address = addr_hex
                .parse()
                .map_err(|e| InterfaceError::Config(format!("address {i}: {e}")))?;
            if signer.address() != stored {
                return Err(InterfaceError::Config(format!(
                    "address {i} does not match its private key (derived {}, stored {stored})",
                    signer.address()
                )));
            }
            accounts.push(Account {
                address: stored,
                signer,
            });
        }

        tracing::info!(count = accounts.len(), "account pool loaded");
        Ok(Self { accounts })
    }

    /// Generate `count` fresh keypairs into the config arrays.
    fn bootstrap(config: &mut TestnetConfig, count: usize) {
        for _ in 0..count {
            let signer = PrivateKeySigner::random();
            config
                .private_keys
                .push(format!("0x{}", alloy::hex::encode(signer.credential().to_bytes())));
            config.addresses.push(signer.address().to_string());
        }
        tracing::info!(count, "generated fresh account pool");
    }

    /// All pool addresses, in fixed load order.
    pub fn addresses(&self) -> Vec<Address> {
        self.accounts.iter().map(|a| a.address).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Address of the account at `index`.
    pub fn address_at(&self, index: usize) -> Result<Address> {
        self.accounts
            .get(index)
            .map(|a| a.address)
            .ok_or(InterfaceError::IndexOutOfRange {
                index,
                count: self.accounts.len(),
            })
    }

    /// Hex private key of the account at `index`, wrapped for restricted
    /// exposure. Never logged by this crate.
    pub fn private_key_at(&self, index: usize) -> Result<PrivateKeyHex> {
        self.accounts
            .get(index)
            .map(|a| {
                PrivateKeyHex(format!(
                    "0x{}",
                    alloy::hex::encode(a.signer.credential().to_bytes())
                ))
            })
            .ok_or(InterfaceError::IndexOutOfRange {
                index,
                count: self.accounts.len(),
            })
    }

    /// Signer for in-process signing only.
    pub(crate) fn signer_at(&self, index: usize) -> Result<&PrivateKeySigner> {
        self.accounts
            .get(index)
            .map(|a| &a.signer)
            .ok_or(InterfaceError::IndexOutOfRange {
                index,
                count: self.accounts.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    // Well-known test key (Anvil's first account).
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDR: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn empty_config() -> TestnetConfig {
        TestnetConfig {
            port: 8545,
            network_id: 1337,
            private_keys: vec![],
            addresses: vec![],
        }
    }

    #[test]
    fn bootstrap_populates_config_and_registry() {
        let mut config = empty_config();
        let registry = AccountRegistry::from_config(&mut config).unwrap();

        assert_eq!(registry.len(), DEFAULT_ACCOUNT_COUNT);
        assert_eq!(config.private_keys.len(), DEFAULT_ACCOUNT_COUNT);
        assert_eq!(config.addresses.len(), DEFAULT_ACCOUNT_COUNT);
        for (i, addr) in config.addresses.iter().enumerate() {
            assert_eq!(registry.address_at(i).unwrap(), addr.parse::<Address>().unwrap());
        }
    }

    #[test]
    fn generated_addresses_rederive_from_their_keys() {
        // Independent derivation path: k256 public key, keccak-256, last
        // 20 bytes.
        let mut config = empty_config();
        AccountRegistry::from_config(&mut config).unwrap();

        for (key_hex, addr_hex) in config.private_keys.iter().zip(&config.addresses) {
            let key_bytes = alloy::hex::decode(key_hex.trim_start_matches("0x")).unwrap();
            let secret = k256::SecretKey::from_slice(&key_bytes).unwrap();
            let public = secret.public_key().to_encoded_point(false);
            let hash = alloy::primitives::keccak256(&public.as_bytes()[1..]);
            let derived = Address::from_slice(&hash[12..]);
            assert_eq!(derived, addr_hex.parse::<Address>().unwrap());
        }
    }

    #[test]
    fn configured_key_loads_with_matching_address() {
        let mut config = empty_config();
        config.private_keys.push(TEST_KEY.into());
        config.addresses.push(TEST_ADDR.into());

        let registry = AccountRegistry::from_config(&mut config).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.address_at(0).unwrap(), TEST_ADDR.parse::<Address>().unwrap());
        assert_eq!(registry.private_key_at(0).unwrap().expose(), TEST_KEY);
    }

    #[test]
    fn mismatched_address_is_rejected() {
        let mut config = empty_config();
        config.private_keys.push(TEST_KEY.into());
        config
            .addresses
            .push("0x000000000000000000000000000000000000dead".into());

        let err = AccountRegistry::from_config(&mut config).unwrap_err();
        assert!(matches!(err, InterfaceError::Config(_)));
    }

    #[test]
    fn out_of_range_indices_fail_on_both_accessors() {
        let mut config = empty_config();
        let registry = AccountRegistry::from_config(&mut config).unwrap();
        let count = registry.len();

        for index in [count, count + 1, usize::MAX] {
            assert!(matches!(
                registry.address_at(index),
                Err(InterfaceError::IndexOutOfRange { .. })
            ));
            assert!(matches!(
                registry.private_key_at(index),
                Err(InterfaceError::IndexOutOfRange { .. })
            ));
        }
        for index in 0..count {
            assert!(registry.address_at(index).is_ok());
            assert!(registry.private_key_at(index).is_ok());
        }
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let mut config = empty_config();
        config.private_keys.push(TEST_KEY.into());
        config.addresses.push(TEST_ADDR.into());
        let registry = AccountRegistry::from_config(&mut config).unwrap();

        let key = registry.private_key_at(0).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("ac0974"));
    }
}
