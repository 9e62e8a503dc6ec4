//! Fundamental types for the Templ engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, reward assets, timestamps and basis-point arithmetic.

pub mod address;
pub mod asset;
pub mod bps;
pub mod time;

pub use address::{Address, AddressParseError};
pub use asset::Asset;
pub use bps::{BPS_DENOMINATOR, ceil_mul_bps, is_valid_bps, mul_bps};
pub use time::Timestamp;
