//! Number-theoretic primitives: fixed-width integers and modular arithmetic.

pub mod field;
pub mod uint256;

pub use field::{add_mod, int_from_bits, mod_inv, mod_sqrt, mul_mod, neg_mod, pow_mod, reduce, sub_mod};
pub use uint256::{U256, U512};
