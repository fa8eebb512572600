//! RFC 6979 deterministic nonce generation.
//!
//! Signing with the same key and message always produces the same nonce
//! (and hence the same signature), removing the RNG as an attack surface —
//! a broken or biased RNG is how several real-world ECDSA private keys have
//! leaked in the wild.

use crate::curve::CurveParams;
use crate::hash::hmac_sha256;
use crate::num::{int_from_bits, reduce, U256};

/// `bits2octets` from SEC 1 §2.3.8 applied to a 32-byte message digest: cast
/// to an integer via `bits2int`, reduce mod `n`, re-encode as bytes.
fn bits2octets(hash: &[u8; 32], curve: &CurveParams) -> [u8; 32] {
    let z = int_from_bits(hash, curve.nlen);
    reduce(&z, &curve.n).to_be_bytes()
}

/// Derive the deterministic nonce `k` for signing `hash` with private scalar `x`.
///
/// secp256k1's hash length equals its order length (both 32 bytes), so the
/// RFC's `T` accumulation loop always produces enough bits in a single HMAC
/// step and the general multi-round `while tlen < qlen` loop collapses away.
#[must_use]
pub fn generate_k(x: &U256, hash: &[u8; 32], curve: &CurveParams) -> U256 {
    let x_bytes = x.to_be_bytes();
    let h1 = bits2octets(hash, curve);

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    let mut msg = Vec::with_capacity(32 + 1 + 32 + 32);
    msg.extend_from_slice(&v);
    msg.push(0x00);
    msg.extend_from_slice(&x_bytes);
    msg.extend_from_slice(&h1);
    k = hmac_sha256(&k, &msg);
    v = hmac_sha256(&k, &v);

    msg.clear();
    msg.extend_from_slice(&v);
    msg.push(0x01);
    msg.extend_from_slice(&x_bytes);
    msg.extend_from_slice(&h1);
    k = hmac_sha256(&k, &msg);
    v = hmac_sha256(&k, &v);

    loop {
        v = hmac_sha256(&k, &v);
        let candidate = int_from_bits(&v, curve.nlen);
        if !candidate.is_zero() && candidate < curve.n {
            return candidate;
        }
        let mut retry_msg = Vec::with_capacity(33);
        retry_msg.extend_from_slice(&v);
        retry_msg.push(0x00);
        k = hmac_sha256(&k, &retry_msg);
        v = hmac_sha256(&k, &v);
    }
}
