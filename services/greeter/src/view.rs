//! Snapshot of a session for display

use serde::Serialize;
use std::fmt;

use crate::explorer::ExplorerLinks;
use crate::ledger::LedgerClient;
use crate::session::GreeterSession;

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub program_id: String,
    pub program_url: String,
    pub greeting_account: String,
    pub greeting_account_url: String,
    pub provisioned: bool,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<u32>,
}

impl SessionView {
    pub async fn capture<C: LedgerClient>(
        session: &GreeterSession<C>,
        links: &ExplorerLinks,
    ) -> Self {
        let program_id = session.program_id();
        let greeting_account = session.greeting_address();
        let last_signature = session.last_signature().await;

        Self {
            program_id: program_id.to_string(),
            program_url: links.account_url(&program_id),
            greeting_account: greeting_account.to_string(),
            greeting_account_url: links.account_url(&greeting_account),
            provisioned: session.is_provisioned(),
            busy: session.is_busy().await,
            last_signature: last_signature.map(|s| s.to_string()),
            transaction_url: last_signature.map(|s| links.transaction_url(&s)),
            counter: session.last_counter().await,
        }
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program:          {}", self.program_id)?;
        writeln!(f, "                  {}", self.program_url)?;
        writeln!(f, "Greeting account: {}", self.greeting_account)?;
        writeln!(f, "                  {}", self.greeting_account_url)?;
        if self.busy {
            writeln!(f, "Transaction initiated. Waiting for confirmations...")?;
        }
        if let (Some(signature), Some(url)) = (&self.last_signature, &self.transaction_url) {
            writeln!(f, "Transaction confirmed: {}", signature)?;
            writeln!(f, "                  {}", url)?;
        }
        if let Some(counter) = self.counter {
            writeln!(f, "Greetings counter: {}", counter)?;
        }
        Ok(())
    }
}
