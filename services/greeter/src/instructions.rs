//! Instruction builders for the greeter program

use shared::{constants::GREETING_SEED, types::GreetingAccount};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};

/// Create the greeting account, funded by and seeded from the payer,
/// owned by the program.
pub fn create_greeting_account_instruction(
    payer: &Pubkey,
    greeting_account: &Pubkey,
    program_id: &Pubkey,
    lamports: u64,
) -> Instruction {
    system_instruction::create_account_with_seed(
        payer,            // funding account
        greeting_account, // new account
        payer,            // base for the seed
        GREETING_SEED,
        lamports,
        GreetingAccount::size() as u64,
        program_id,
    )
}

/// Build the greet instruction.
///
/// The program has a single instruction, so the data is empty. The greeting
/// account is the only account: writable, not a signer.
pub fn greet_instruction(program_id: &Pubkey, greeting_account: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*greeting_account, false)],
        data: vec![],
    }
}
