//! Validator identifier resolution
//!
//! Turns user-supplied validator identifiers into validator records:
//! - numeric indices (`42`)
//! - `0x`-prefixed BLS public keys
//! - `wallet/account` paths, resolved through an account provider
//! - inclusive index ranges (`100-199`), looked up in a single batch

pub mod context;
pub mod errors;
pub mod provider;
pub mod resolver;
pub mod stub;
pub mod types;

pub use context::*;
pub use errors::*;
pub use provider::*;
pub use resolver::*;
pub use stub::*;
pub use types::*;
