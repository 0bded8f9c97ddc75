//! Streams counter updates for the greeting account over websocket

use futures::StreamExt;
use shared::types::{GreetingAccount, LayoutError};
use solana_account_decoder::{UiAccountData, UiAccountEncoding};
use solana_client::{nonblocking::pubsub_client::PubsubClient, rpc_config::RpcAccountInfoConfig};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::errors::{GreeterError, Result};

#[derive(Debug, thiserror::Error)]
pub enum UpdateDecodeError {
    #[error("Account update is not binary encoded")]
    UnsupportedEncoding,

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub struct CounterWatcher {
    ws_url: String,
    address: Pubkey,
    commitment: CommitmentConfig,
}

impl CounterWatcher {
    pub fn new(ws_url: impl Into<String>, address: Pubkey, commitment: CommitmentConfig) -> Self {
        Self {
            ws_url: ws_url.into(),
            address,
            commitment,
        }
    }

    pub fn for_connection(connection: &Connection, address: Pubkey) -> Self {
        Self::new(connection.ws_url(), address, connection.commitment())
    }

    /// Call `on_counter` with every counter value the account takes, until
    /// the subscription ends or `cancel` fires.
    pub async fn run<F>(&self, cancel: &CancellationToken, mut on_counter: F) -> Result<()>
    where
        F: FnMut(u32) + Send,
    {
        let pubsub_client = PubsubClient::new(&self.ws_url)
            .await
            .map_err(|e| GreeterError::Subscription(e.to_string()))?;

        let config = RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            commitment: Some(self.commitment),
            ..RpcAccountInfoConfig::default()
        };

        let (mut updates, unsubscribe) = pubsub_client
            .account_subscribe(&self.address, Some(config))
            .await
            .map_err(|e| GreeterError::Subscription(e.to_string()))?;

        info!(greeting_account = %self.address, ws_url = %self.ws_url, "Watching greetings counter");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(greeting_account = %self.address, "Counter watch cancelled");
                    break;
                }
                update = updates.next() => match update {
                    Some(response) => match decode_counter_update(&response.value.data) {
                        Ok(counter) => {
                            debug!(slot = response.context.slot, counter, "Counter update");
                            on_counter(counter);
                        }
                        Err(e) => {
                            warn!(slot = response.context.slot, error = %e, "Skipping undecodable account update");
                        }
                    },
                    None => {
                        warn!(greeting_account = %self.address, "Account subscription ended");
                        break;
                    }
                }
            }
        }

        unsubscribe().await;
        Ok(())
    }
}

pub fn decode_counter_update(data: &UiAccountData) -> std::result::Result<u32, UpdateDecodeError> {
    let bytes = data.decode().ok_or(UpdateDecodeError::UnsupportedEncoding)?;
    Ok(GreetingAccount::unpack(&bytes)?.counter)
}
