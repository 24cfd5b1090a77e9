//! Wallet identity and orchestration
//!
//! The private key lives only in [`Identity`]; everything else sees
//! addresses, signatures and PEM exports the caller explicitly asked for.

mod address;
mod amount;
mod identity;
mod orchestrator;

pub use address::{Address, ADDRESS_HEX_LEN};
pub use amount::Amount;
pub use identity::{verify_amount, ExportedKeys, Identity, IdentityState};
pub use orchestrator::{Wallet, DEFAULT_HISTORY_COUNT};
