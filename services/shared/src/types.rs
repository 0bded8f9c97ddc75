//! On-chain layout of the greeting account

use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::OnceLock;

/// State of a greeting account managed by the hello world program.
///
/// Borsh layout: `counter: u32` (little-endian), nothing else. No
/// discriminator, no padding, no version tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GreetingAccount {
    pub counter: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Account data too short: {actual} bytes (expected {expected})")]
    TooShort { expected: usize, actual: usize },

    #[error("Malformed greeting account: {0}")]
    Malformed(#[from] std::io::Error),
}

static GREETING_SIZE: OnceLock<usize> = OnceLock::new();

impl GreetingAccount {
    /// Byte size of a serialized greeting account, computed once from the
    /// Borsh layout.
    pub fn size() -> usize {
        *GREETING_SIZE.get_or_init(|| {
            GreetingAccount::default()
                .try_to_vec()
                .map(|bytes| bytes.len())
                .unwrap_or(std::mem::size_of::<u32>())
        })
    }

    /// Decode account data.
    ///
    /// Fails on short buffers and on trailing bytes, so a resized or foreign
    /// account never yields a counter.
    pub fn unpack(data: &[u8]) -> Result<Self, LayoutError> {
        let expected = Self::size();
        if data.len() < expected {
            return Err(LayoutError::TooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::try_from_slice(data)?)
    }

    pub fn pack(&self) -> Result<Vec<u8>, LayoutError> {
        Ok(self.try_to_vec()?)
    }
}
