//! Local wallet store
//!
//! Wallets hold validator accounts by name so that `wallet/account` paths can
//! be turned into public keys. Only public material is stored.

pub mod errors;
pub mod storage;
pub mod types;

pub use errors::*;
pub use storage::*;
pub use types::*;
