//! secp256k1 curve arithmetic, ECDSA, and a Bitcoin transaction/PSBT codec
//! core, with byte-exact wire compatibility as the guiding constraint rather
//! than ergonomics on top of another crate's `Transaction` type.
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(missing_debug_implementations)]

pub mod address;
pub mod amount;
pub mod base58;
pub mod curve;
pub mod der;
pub mod ecdsa;
pub mod encode;
pub mod error;
pub mod hash;
pub mod keys;
pub mod num;
pub mod psbt;
pub mod rfc6979;
pub mod script;
pub mod transaction;

pub use error::{Error, ErrorKind, Result};
