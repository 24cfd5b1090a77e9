//! Error types for the FTR wallet

use crate::rpc::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No key loaded: create or import a wallet first")]
    NoKeyLoaded,

    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("RPC error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Key encoding failed: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
