//! Block-explorer links for addresses and transactions

use shared::constants::MAINNET_CLUSTER;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    base_url: String,
    cluster: String,
}

impl ExplorerLinks {
    pub fn new(base_url: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cluster: cluster.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.explorer.base_url.clone(), config.solana.cluster.clone())
    }

    pub fn account_url(&self, address: &Pubkey) -> String {
        self.link("address", &address.to_string())
    }

    pub fn transaction_url(&self, signature: &Signature) -> String {
        self.link("tx", &signature.to_string())
    }

    fn link(&self, kind: &str, id: &str) -> String {
        if self.cluster == MAINNET_CLUSTER {
            format!("{}/{}/{}", self.base_url, kind, id)
        } else {
            format!("{}/{}/{}?cluster={}", self.base_url, kind, id, self.cluster)
        }
    }
}
