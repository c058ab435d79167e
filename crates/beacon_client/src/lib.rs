//! Beacon node REST client
//!
//! Implements [`ValidatorsProvider`](stakectl_validator_resolution::ValidatorsProvider)
//! on top of `GET /eth/v1/beacon/states/{state_id}/validators`.

pub mod client;
pub mod response;

pub use client::*;
pub use response::*;
