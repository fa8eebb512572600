//! Curve parameter record and the secp256k1 instance.

use crate::curve::affine::Affine;
use crate::curve::jacobian::Jacobian;
use crate::num::U256;

/// Immutable description of a short-Weierstrass curve `y^2 = x^3 + a*x + b (mod p)`
/// over a prime field, together with its generator and subgroup order.
///
/// The arithmetic engine in [`crate::curve`] is written against this record
/// rather than hardcoded secp256k1 constants, so a second parameter set could
/// be added without touching `affine.rs` or `jacobian.rs` — even though
/// production use (and every constructor in this crate) targets
/// [`secp256k1`] exclusively.
pub struct CurveParams {
    pub p: U256,
    pub a: U256,
    pub b: U256,
    pub n: U256,
    pub cofactor: u32,
    pub generator: Affine,
    /// `ceil(log2(p) / 8)`: width in bytes of a field element.
    pub psize: usize,
    /// `ceil(log2(n) / 8)`: width in bytes of a scalar.
    pub nsize: usize,
    pub plen: u32,
    pub nlen: u32,
}

impl CurveParams {
    #[must_use]
    pub fn generator_jacobian(&self) -> Jacobian {
        Jacobian::from_affine(&self.generator)
    }
}

fn u256_from_hex(hex: &str) -> U256 {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(hex, &mut bytes).expect("static curve constant must be valid hex");
    U256::from_be_bytes(&bytes)
}

/// The secp256k1 curve: `y^2 = x^3 + 7` over `p = 2^256 - 2^32 - 977`.
#[must_use]
pub fn secp256k1() -> CurveParams {
    CurveParams {
        p: u256_from_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
        a: U256::ZERO,
        b: U256::from_u64(7),
        n: u256_from_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
        cofactor: 1,
        generator: Affine::Point {
            x: u256_from_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
            y: u256_from_hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        },
        psize: 32,
        nsize: 32,
        plen: 256,
        nlen: 256,
    }
}
