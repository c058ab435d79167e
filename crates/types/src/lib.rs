//! Core types for stakectl.
//!
//! Validator records follow the JSON shape served by beacon nodes under
//! `/eth/v1/beacon/states/{state_id}/validators`.

pub mod pubkey;
pub mod quoted;
pub mod state;
pub mod validator;

pub use pubkey::*;
pub use state::*;
pub use validator::*;
