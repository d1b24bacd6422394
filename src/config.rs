// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Testnet Interface Authors

//! Endpoint configuration for the local testnet node.
//!
//! The config file is plain JSON and doubles as the identity store for the
//! account pool: the bootstrap path writes freshly generated keypairs back
//! into it so addresses stay stable across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InterfaceError, Result};

/// On-disk configuration for the testnet endpoint and account pool.
///
/// `private_keys` and `addresses` are parallel arrays of 0x-prefixed hex
/// strings. Empty arrays mean the pool has not been bootstrapped yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestnetConfig {
    /// JSON-RPC port of the local node.
    pub port: u16,
    /// Chain id used for replay protection when signing.
    pub network_id: u64,
    /// Hex-encoded private keys, parallel to `addresses`.
    #[serde(default)]
    pub private_keys: Vec<String>,
    /// Hex-encoded account addresses, parallel to `private_keys`.
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl TestnetConfig {
    /// Load the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InterfaceError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            InterfaceError::Config(format!("invalid JSON in {}: {e}", path.display()))
        })?;
        if config.private_keys.len() != config.addresses.len() {
            return Err(InterfaceError::Config(format!(
                "{} private keys but {} addresses in {}",
                config.private_keys.len(),
                config.addresses.len(),
                path.display()
            )));
        }
        Ok(config)
    }

    /// Persist the configuration, overwriting the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| InterfaceError::Config(format!("serialize config: {e}")))?;
        std::fs::write(path, raw)
            .map_err(|e| InterfaceError::Config(format!("cannot write {}: {e}", path.display())))
    }

    /// JSON-RPC endpoint URL. The node is assumed local; only the port varies.
    pub fn rpc_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testnet.json");

        let config = TestnetConfig {
            port: 8545,
            network_id: 1337,
            private_keys: vec!["0xab".into()],
            addresses: vec!["0xcd".into()],
        };
        config.save(&path).unwrap();

        let loaded = TestnetConfig::load(&path).unwrap();
        assert_eq!(loaded.port, 8545);
        assert_eq!(loaded.network_id, 1337);
        assert_eq!(loaded.private_keys, config.private_keys);
        assert_eq!(loaded.addresses, config.addresses);
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testnet.json");
        std::fs::write(&path, r#"{"port": 7545, "network_id": 5777}"#).unwrap();

        let loaded = TestnetConfig::load(&path).unwrap();
        assert!(loaded.private_keys.is_empty());
        assert!(loaded.addresses.is_empty());
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testnet.json");
        std::fs::write(
            &path,
            r#"{"port": 8545, "network_id": 1337, "private_keys": ["0xab"], "addresses": []}"#,
        )
        .unwrap();

        let err = TestnetConfig::load(&path).unwrap_err();
        assert!(matches!(err, InterfaceError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = TestnetConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, InterfaceError::Config(_)));
    }

    #[test]
    fn rpc_url_uses_the_configured_port() {
        let config = TestnetConfig {
            port: 9999,
            network_id: 1,
            private_keys: vec![],
            addresses: vec![],
        };
        assert_eq!(config.rpc_url(), "http://127.0.0.1:9999");
    }
}
