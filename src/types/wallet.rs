//! Wallet credentials

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use std::fmt;
use std::str::FromStr;
use crate::errors::{BotError, BotResult};

/// A signing key and the address it controls. Never prints the key.
#[derive(Clone)]
pub struct WalletCredential {
    signer: PrivateKeySigner,
}

impl WalletCredential {
    pub fn parse(key: &str) -> BotResult<Self> {
        let signer = PrivateKeySigner::from_str(key.trim())
            .map_err(|_| BotError::Config("private key is not a valid secp256k1 key".to_string()))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredential")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Parses a comma separated list of private keys. Blank entries are ignored.
pub fn parse_wallets(csv: &str) -> BotResult<Vec<WalletCredential>> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, key)| {
            WalletCredential::parse(key)
                .map_err(|_| BotError::Config(format!("PRIVATE_KEYS entry #{} is not a valid private key", i + 1)))
        })
        .collect()
}
