use serde::Deserialize;
use shared::constants::{
    DEFAULT_CLUSTER, DEFAULT_COMMITMENT, DEFAULT_EXPLORER_BASE_URL, DEFAULT_RPC_URL,
};
use std::env;

use crate::errors::{GreeterError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub solana: SolanaConfig,
    pub identity: IdentityConfig,
    pub explorer: ExplorerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub commitment: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub payer_keypair_path: String,
    pub program: ProgramSource,
}

/// Where the program's public key comes from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramSource {
    /// Base58 public key
    Id(String),
    /// Keypair file produced when the program was deployed
    KeypairPath(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rpc_url = var("SOLANA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let ws_url = var("SOLANA_WS_URL").unwrap_or_else(|| websocket_url_for(&rpc_url));

        let payer_keypair_path = var("GREETER_PAYER_KEYPAIR")
            .ok_or_else(|| GreeterError::Config("GREETER_PAYER_KEYPAIR must be set".into()))?;

        let program = match (var("GREETER_PROGRAM_ID"), var("GREETER_PROGRAM_KEYPAIR")) {
            (Some(id), _) => ProgramSource::Id(id),
            (None, Some(path)) => ProgramSource::KeypairPath(path),
            (None, None) => {
                return Err(GreeterError::Config(
                    "GREETER_PROGRAM_ID or GREETER_PROGRAM_KEYPAIR must be set".into(),
                ))
            }
        };

        Ok(Config {
            solana: SolanaConfig {
                rpc_url,
                ws_url,
                commitment: var("SOLANA_COMMITMENT")
                    .unwrap_or_else(|| DEFAULT_COMMITMENT.to_string()),
                cluster: var("SOLANA_CLUSTER").unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            },
            identity: IdentityConfig {
                payer_keypair_path,
                program,
            },
            explorer: ExplorerConfig {
                base_url: var("EXPLORER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_EXPLORER_BASE_URL.to_string()),
            },
        })
    }
}

/// Websocket endpoint paired with an RPC endpoint.
///
/// `http` becomes `ws`, `https` becomes `wss`, and an explicit port moves up
/// by one (the validator serves pubsub on `rpc_port + 1`).
pub fn websocket_url_for(rpc_url: &str) -> String {
    let Some((scheme, rest)) = rpc_url.split_once("://") else {
        return rpc_url.to_string();
    };

    let ws_scheme = match scheme {
        "https" => "wss",
        "http" => "ws",
        other => other,
    };

    let (authority, path) = match rest.find('/') {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };

    let authority = match authority.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => format!("{}:{}", host, port.saturating_add(1)),
            Err(_) => authority.to_string(),
        },
        None => authority.to_string(),
    };

    format!("{}://{}{}", ws_scheme, authority, path)
}
