/// In-memory ledger used by the integration tests
///
/// Emulates just enough of the runtime for the greeter: the system program's
/// `CreateAccountWithSeed` and the greeting program's counter increment.
/// Transactions apply atomically; a rejected one leaves no trace.
use async_trait::async_trait;
use greeter::{Identities, LedgerClient};
use shared::types::GreetingAccount;
use solana_client::client_error::{ClientError, ClientErrorKind, Result as ClientResult};
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    rent::Rent,
    signature::{Keypair, Signature, Signer},
    system_instruction::SystemInstruction,
    system_program,
    transaction::Transaction,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const PAYER_STARTING_BALANCE: u64 = 10_000_000_000;

/// Pauses `send_and_confirm` until released
#[derive(Clone, Default)]
pub struct SendGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub struct InMemoryLedger {
    greeting_program: Pubkey,
    accounts: Mutex<HashMap<Pubkey, Account>>,
    confirmed: Mutex<Vec<Transaction>>,
    send_attempts: AtomicUsize,
    blockhash_seq: AtomicU64,
    reject_next: Mutex<Option<String>>,
    reads_fail: AtomicBool,
    blockhash_fails: AtomicBool,
    gate: Mutex<Option<SendGate>>,
}

impl InMemoryLedger {
    pub fn new(greeting_program: Pubkey) -> Self {
        Self {
            greeting_program,
            accounts: Mutex::new(HashMap::new()),
            confirmed: Mutex::new(Vec::new()),
            send_attempts: AtomicUsize::new(0),
            blockhash_seq: AtomicU64::new(1),
            reject_next: Mutex::new(None),
            reads_fail: AtomicBool::new(false),
            blockhash_fails: AtomicBool::new(false),
            gate: Mutex::new(None),
        }
    }

    pub fn fund(&self, address: &Pubkey, lamports: u64) {
        self.insert_account(
            address,
            Account {
                lamports,
                data: vec![],
                owner: system_program::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn insert_account(&self, address: &Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(*address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.account(address).map(|a| a.lamports).unwrap_or(0)
    }

    /// Transactions that were applied
    pub fn confirmed_count(&self) -> usize {
        self.confirmed.lock().unwrap().len()
    }

    /// Every call to `send_and_confirm`, applied or not
    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }

    pub fn reject_next_send(&self, reason: &str) {
        *self.reject_next.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Fail `latest_blockhash` only, leaving account reads working
    pub fn fail_blockhash(&self, fail: bool) {
        self.blockhash_fails.store(fail, Ordering::SeqCst);
    }

    pub fn hold_sends(&self) -> SendGate {
        let gate = SendGate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn execute(&self, transaction: &Transaction) -> Result<(), String> {
        transaction
            .verify()
            .map_err(|e| format!("signature verification failed: {}", e))?;

        let keys = &transaction.message.account_keys;
        let mut accounts = self.accounts.lock().unwrap();
        let mut staged = accounts.clone();

        for ix in &transaction.message.instructions {
            let program_id = keys[ix.program_id_index as usize];
            let ix_accounts: Vec<Pubkey> = ix.accounts.iter().map(|i| keys[*i as usize]).collect();

            if program_id == system_program::id() {
                let instruction: SystemInstruction = bincode::deserialize(&ix.data)
                    .map_err(|e| format!("invalid system instruction: {}", e))?;
                Self::apply_system(&mut staged, &ix_accounts, instruction)?;
            } else if program_id == self.greeting_program {
                self.apply_greet(&mut staged, &ix_accounts)?;
            } else {
                return Err(format!("program {} is not deployed", program_id));
            }
        }

        *accounts = staged;
        Ok(())
    }

    fn apply_system(
        accounts: &mut HashMap<Pubkey, Account>,
        ix_accounts: &[Pubkey],
        instruction: SystemInstruction,
    ) -> Result<(), String> {
        let SystemInstruction::CreateAccountWithSeed {
            base,
            seed,
            lamports,
            space,
            owner,
        } = instruction
        else {
            return Err("unsupported system instruction".to_string());
        };

        let from = ix_accounts[0];
        let to = ix_accounts[1];

        let derived = Pubkey::create_with_seed(&base, &seed, &owner).map_err(|e| e.to_string())?;
        if derived != to {
            return Err(format!("address {} does not match seed derivation", to));
        }
        if accounts.contains_key(&to) {
            return Err(format!("account {} already in use", to));
        }

        let payer = accounts
            .get_mut(&from)
            .ok_or_else(|| "attempt to debit an account but found no record of a prior credit".to_string())?;
        if payer.lamports < lamports {
            return Err(format!(
                "insufficient lamports {}, need {}",
                payer.lamports, lamports
            ));
        }
        payer.lamports -= lamports;

        accounts.insert(
            to,
            Account {
                lamports,
                data: vec![0; space as usize],
                owner,
                executable: false,
                rent_epoch: 0,
            },
        );
        Ok(())
    }

    fn apply_greet(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        ix_accounts: &[Pubkey],
    ) -> Result<(), String> {
        let address = ix_accounts
            .first()
            .ok_or_else(|| "missing greeting account".to_string())?;
        let account = accounts
            .get_mut(address)
            .ok_or_else(|| format!("greeting account {} does not exist", address))?;
        if account.owner != self.greeting_program {
            return Err("Greeted account does not have the correct program id".to_string());
        }

        let mut greeting = GreetingAccount::unpack(&account.data).map_err(|e| e.to_string())?;
        greeting.counter += 1;
        account.data = greeting.pack().map_err(|e| e.to_string())?;
        Ok(())
    }

    fn read_error(&self) -> Option<ClientError> {
        self.reads_fail
            .load(Ordering::SeqCst)
            .then(|| ClientError::from(ClientErrorKind::Custom("connection refused".into())))
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn get_account(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        if let Some(e) = self.read_error() {
            return Err(e);
        }
        Ok(self.account(address))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        if let Some(e) = self.read_error() {
            return Err(e);
        }
        Ok(Rent::default().minimum_balance(data_len))
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        if self.blockhash_fails.load(Ordering::SeqCst) {
            return Err(ClientError::from(ClientErrorKind::Custom(
                "connection refused".into(),
            )));
        }

        // Distinct blockhashes keep repeated greetings from signing identically
        let seq = self.blockhash_seq.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seq.to_le_bytes());
        Ok(Hash::new_from_array(bytes))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if let Some(reason) = self.reject_next.lock().unwrap().take() {
            return Err(ClientError::from(ClientErrorKind::Custom(reason)));
        }

        self.execute(transaction)
            .map_err(|reason| ClientError::from(ClientErrorKind::Custom(reason)))?;

        self.confirmed.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

/// Fresh payer/program pair on a ledger where only the payer is funded
pub fn setup() -> (Arc<InMemoryLedger>, Identities) {
    let payer = Keypair::new();
    let program_id = Pubkey::new_unique();
    let ledger = Arc::new(InMemoryLedger::new(program_id));
    ledger.fund(&payer.pubkey(), PAYER_STARTING_BALANCE);
    (ledger, Identities::new(payer, program_id))
}
