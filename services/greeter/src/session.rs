//! Greeter session: provisioning, greeting and reading the counter
//!
//! All state the operations share (identities, derived address, last
//! transaction, last counter) lives on `GreeterSession`, which can be held
//! behind an `Arc` and used from several tasks.

use shared::types::GreetingAccount;
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    transaction::Transaction,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::address::derive_greeting_address;
use crate::errors::{GreeterError, Result};
use crate::identity::Identities;
use crate::instructions::{create_greeting_account_instruction, greet_instruction};
use crate::ledger::LedgerClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created { signature: Signature, lamports: u64 },
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreetOutcome {
    pub signature: Signature,
    pub counter: u32,
}

/// Greet lifecycle. A failed or cancelled submission drops back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetState {
    Idle,
    Submitting,
    Confirmed(Signature),
}

pub struct GreeterSession<C> {
    client: Arc<C>,
    identities: Identities,
    greeting_address: Pubkey,
    provisioned: AtomicBool,
    state: RwLock<GreetState>,
    last_signature: RwLock<Option<Signature>>,
    last_counter: RwLock<Option<u32>>,
}

impl<C: LedgerClient> GreeterSession<C> {
    pub fn new(client: Arc<C>, identities: Identities) -> Result<Self> {
        let greeting_address =
            derive_greeting_address(&identities.payer().pubkey(), &identities.program_id())?;

        debug!(
            payer = %identities.payer().pubkey(),
            program_id = %identities.program_id(),
            greeting_account = %greeting_address,
            "Greeter session created"
        );

        Ok(Self {
            client,
            identities,
            greeting_address,
            provisioned: AtomicBool::new(false),
            state: RwLock::new(GreetState::Idle),
            last_signature: RwLock::new(None),
            last_counter: RwLock::new(None),
        })
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn greeting_address(&self) -> Pubkey {
        self.greeting_address
    }

    pub fn program_id(&self) -> Pubkey {
        self.identities.program_id()
    }

    pub fn payer(&self) -> Pubkey {
        self.identities.payer().pubkey()
    }

    pub fn is_provisioned(&self) -> bool {
        self.provisioned.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> GreetState {
        *self.state.read().await
    }

    /// True while a greeting is waiting for confirmation. Informational
    /// only: a second `greet` is not refused.
    pub async fn is_busy(&self) -> bool {
        matches!(*self.state.read().await, GreetState::Submitting)
    }

    pub async fn last_signature(&self) -> Option<Signature> {
        *self.last_signature.read().await
    }

    pub async fn last_counter(&self) -> Option<u32> {
        *self.last_counter.read().await
    }

    /// Create the greeting account unless it already exists.
    ///
    /// Waits for the creation transaction to confirm, so a `greet` issued
    /// after this returns always finds the account.
    pub async fn ensure_greeting_account(&self) -> Result<Provisioned> {
        let address = self.greeting_address;

        let existing = self
            .client
            .get_account(&address)
            .await
            .map_err(GreeterError::connection)?;

        if let Some(account) = existing {
            self.check_existing_account(&account)?;
            self.provisioned.store(true, Ordering::SeqCst);
            info!(greeting_account = %address, "Greeting account already exists");
            return Ok(Provisioned::AlreadyExists);
        }

        let space = GreetingAccount::size();
        let lamports = self
            .client
            .minimum_balance_for_rent_exemption(space)
            .await
            .map_err(GreeterError::connection)?;

        info!(
            greeting_account = %address,
            lamports,
            space,
            "Creating account to say hello to"
        );

        let instruction =
            create_greeting_account_instruction(&self.payer(), &address, &self.program_id(), lamports);

        let transaction = self.signed_transaction(&[instruction]).await?;
        let signature = self
            .client
            .send_and_confirm(&transaction)
            .await
            .map_err(|e| {
                warn!(greeting_account = %address, error = %e, "Greeting account creation failed");
                GreeterError::ProvisioningRejected {
                    address,
                    source: Box::new(e),
                }
            })?;

        self.provisioned.store(true, Ordering::SeqCst);
        info!(greeting_account = %address, signature = %signature, "Greeting account created");

        Ok(Provisioned::Created { signature, lamports })
    }

    /// Send one greeting and read the resulting counter.
    pub async fn greet(&self) -> Result<GreetOutcome> {
        self.greet_with_cancel(&CancellationToken::new()).await
    }

    /// Like `greet`, but stops waiting once `cancel` fires. The transaction
    /// may still land after a cancellation.
    pub async fn greet_with_cancel(&self, cancel: &CancellationToken) -> Result<GreetOutcome> {
        if !self.is_provisioned() {
            return Err(GreeterError::NotProvisioned(self.greeting_address));
        }

        let instruction = greet_instruction(&self.program_id(), &self.greeting_address);
        *self.state.write().await = GreetState::Submitting;
        info!(greeting_account = %self.greeting_address, "Transaction initiated, waiting for confirmation");

        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GreeterError::Cancelled),
            result = self.submit_greeting(instruction) => result,
        };

        let signature = match submitted {
            Ok(signature) => signature,
            Err(e) => {
                *self.state.write().await = GreetState::Idle;
                warn!(greeting_account = %self.greeting_address, error = %e, "Greeting failed");
                return Err(e);
            }
        };

        *self.last_signature.write().await = Some(signature);
        *self.state.write().await = GreetState::Confirmed(signature);
        info!(signature = %signature, "Greeting confirmed");

        let counter = self.read_counter().await?;
        Ok(GreetOutcome { signature, counter })
    }

    /// Fetch and decode the greeting account counter.
    pub async fn read_counter(&self) -> Result<u32> {
        let address = self.greeting_address;

        let account = self
            .client
            .get_account(&address)
            .await
            .map_err(GreeterError::connection)?
            .ok_or(GreeterError::AccountNotFound(address))?;

        let greeting = GreetingAccount::unpack(&account.data)
            .map_err(|source| GreeterError::Decode { address, source })?;

        *self.last_counter.write().await = Some(greeting.counter);
        debug!(greeting_account = %address, counter = greeting.counter, "Greetings counter read");

        Ok(greeting.counter)
    }

    fn check_existing_account(&self, account: &Account) -> Result<()> {
        let program_id = self.program_id();
        if account.owner != program_id {
            return Err(GreeterError::IncompatibleAccount {
                address: self.greeting_address,
                reason: format!("owned by {} instead of {}", account.owner, program_id),
            });
        }

        let expected = GreetingAccount::size();
        if account.data.len() < expected {
            return Err(GreeterError::IncompatibleAccount {
                address: self.greeting_address,
                reason: format!("{} bytes of data, expected {}", account.data.len(), expected),
            });
        }

        Ok(())
    }

    async fn submit_greeting(&self, instruction: Instruction) -> Result<Signature> {
        let transaction = self.signed_transaction(&[instruction]).await?;
        self.client
            .send_and_confirm(&transaction)
            .await
            .map_err(|e| GreeterError::Submission(Box::new(e)))
    }

    /// Sign `instructions` against a fresh blockhash. Failing to fetch the
    /// blockhash is a connection error.
    async fn signed_transaction(&self, instructions: &[Instruction]) -> Result<Transaction> {
        let payer = self.identities.payer();
        let recent_blockhash = self
            .client
            .latest_blockhash()
            .await
            .map_err(GreeterError::connection)?;

        Ok(Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &[payer],
            recent_blockhash,
        ))
    }
}
