//! Seed-derived address of the greeting account

use shared::constants::GREETING_SEED;
use solana_sdk::pubkey::{Pubkey, PubkeyError};

/// Derive the greeting account for a payer and program.
///
/// `create_with_seed(payer, "hello", program)`; no private key exists for
/// the result, the payer signs for it as the base.
pub fn derive_greeting_address(payer: &Pubkey, program_id: &Pubkey) -> Result<Pubkey, PubkeyError> {
    derive_seeded_address(payer, GREETING_SEED, program_id)
}

pub fn derive_seeded_address(
    base: &Pubkey,
    seed: &str,
    owner: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
    Pubkey::create_with_seed(base, seed, owner)
}
