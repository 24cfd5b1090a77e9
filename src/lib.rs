//! Future (FTR) Wallet
//!
//! A minimal client for the FTR network:
//! - Generates, imports and exports a P-256 keypair (PKCS#8 / SPKI PEM)
//! - Derives the account address as SHA-256 of the public key PEM
//! - Signs transfer amounts with ECDSA/SHA-256
//! - Talks to a node over JSON-RPC for balances, sends and history
//!
//! # Security Model
//!
//! - The private key never leaves [`wallet::Identity`] except through an
//!   explicit export, wrapped in a `SecretString`
//! - Keys and RPC passwords are redacted from `Debug` output and never logged
//! - Signatures cover the amount only; sender, receiver and nonce are not
//!   signed, so a signature is replayable for the same amount

pub mod config;
pub mod menu;
pub mod rpc;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{Config, Network, TransportConfig, PRIVATE_KEY_PEM_ENV};
pub use error::{Error, Result};
pub use menu::Menu;
pub use rpc::{JsonRpcClient, Transport, TransportError};
pub use wallet::{Address, Amount, Identity, Wallet};
