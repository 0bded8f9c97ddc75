/// Shared constants for the greeter client
///
/// Centralizes the seed, endpoint defaults and explorer settings so the
/// library, the binary and the tests agree on them.

/// Seed string used to derive the greeting account from the payer.
///
/// Changing it moves the greeting account to a different address; any
/// counter stored under the old seed is left behind.
pub const GREETING_SEED: &str = "hello";

/// Default RPC endpoint (local test validator)
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Default commitment used for reads and confirmations
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Default cluster name, only used when building explorer links
pub const DEFAULT_CLUSTER: &str = "devnet";

/// Public block explorer
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://explorer.solana.com";

/// Cluster for which explorer links carry no `?cluster=` query
pub const MAINNET_CLUSTER: &str = "mainnet-beta";
