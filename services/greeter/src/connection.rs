use async_trait::async_trait;
use solana_client::{client_error::Result as ClientResult, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::config::SolanaConfig;
use crate::ledger::LedgerClient;

/// RPC session plus the websocket endpoint used for subscriptions.
///
/// Nothing is dialled here; an unreachable endpoint shows up as a
/// connection error on the first request.
pub struct Connection {
    rpc: RpcClient,
    ws_url: String,
    commitment: CommitmentConfig,
}

impl Connection {
    pub fn new(rpc_url: String, ws_url: String, commitment: &str) -> Self {
        let commitment = parse_commitment(commitment);
        tracing::debug!(rpc_url = %rpc_url, ws_url = %ws_url, commitment = ?commitment.commitment, "Opening connection");
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url, commitment),
            ws_url,
            commitment,
        }
    }

    pub fn from_config(config: &SolanaConfig) -> Self {
        Self::new(
            config.rpc_url.clone(),
            config.ws_url.clone(),
            &config.commitment,
        )
    }

    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}

pub fn parse_commitment(commitment: &str) -> CommitmentConfig {
    match commitment {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

#[async_trait]
impl LedgerClient for Connection {
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.rpc.get_latest_blockhash().await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature> {
        self.rpc.send_and_confirm_transaction(transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::commitment_config::CommitmentLevel;

    #[test]
    fn test_parse_commitment() {
        assert_eq!(
            parse_commitment("processed").commitment,
            CommitmentLevel::Processed
        );
        assert_eq!(
            parse_commitment("finalized").commitment,
            CommitmentLevel::Finalized
        );
        assert_eq!(
            parse_commitment("confirmed").commitment,
            CommitmentLevel::Confirmed
        );
    }

    #[test]
    fn test_unknown_commitment_falls_back_to_confirmed() {
        assert_eq!(parse_commitment("max").commitment, CommitmentLevel::Confirmed);
        assert_eq!(parse_commitment("").commitment, CommitmentLevel::Confirmed);
    }

    #[tokio::test]
    async fn test_new_does_not_dial() {
        let connection = Connection::new(
            "http://127.0.0.1:1".to_string(),
            "ws://127.0.0.1:2".to_string(),
            "finalized",
        );
        assert_eq!(connection.rpc_url(), "http://127.0.0.1:1");
        assert_eq!(connection.ws_url(), "ws://127.0.0.1:2");
        assert_eq!(connection.commitment().commitment, CommitmentLevel::Finalized);
    }
}
