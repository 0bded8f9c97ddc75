//! RPC surface the greeter session depends on

use async_trait::async_trait;
use solana_client::client_error::Result as ClientResult;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

/// Reads and writes against the ledger.
///
/// `Connection` implements this over the RPC client; tests plug in an
/// in-memory ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch an account, `None` when nothing lives at `address`.
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Option<Account>>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64>;

    async fn latest_blockhash(&self) -> ClientResult<Hash>;

    /// Submit a signed transaction and wait until it is confirmed or fails.
    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature>;
}
