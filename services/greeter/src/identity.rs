//! Payer and program identities, loaded from keypair files

use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::path::Path;
use std::str::FromStr;

use crate::config::{IdentityConfig, ProgramSource};
use crate::errors::{GreeterError, Result};

pub struct Identities {
    payer: Keypair,
    program_id: Pubkey,
}

impl Identities {
    pub fn new(payer: Keypair, program_id: Pubkey) -> Self {
        Self { payer, program_id }
    }

    pub fn load(config: &IdentityConfig) -> Result<Self> {
        let payer = load_keypair(&config.payer_keypair_path)?;
        let program_id = match &config.program {
            ProgramSource::Id(id) => parse_program_id(id)?,
            ProgramSource::KeypairPath(path) => load_keypair(path)?.pubkey(),
        };
        Ok(Self::new(payer, program_id))
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }
}

pub fn load_keypair(path: &str) -> Result<Keypair> {
    read_keypair_file(Path::new(path)).map_err(|e| GreeterError::Identity {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_program_id(id: &str) -> Result<Pubkey> {
    Pubkey::from_str(id.trim())
        .map_err(|e| GreeterError::Config(format!("Invalid program id {:?}: {}", id, e)))
}
