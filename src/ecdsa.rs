//! ECDSA signing, verification, public-key recovery, and nonce-reuse key
//! recovery ("cracking") over secp256k1.

use crate::curve::jacobian::double_scalar_mul;
use crate::curve::{lift_x, secp256k1, Affine, CurveParams, Jacobian};
use crate::der;
use crate::error::Error;
use crate::keys::{PrivateKey, PublicKey};
use crate::num::{add_mod, int_from_bits, mod_inv, mul_mod, neg_mod, reduce, sub_mod, U256};
use crate::rfc6979::generate_k;

/// An ECDSA signature, plus the recovery id needed to go from `(r, s)` and a
/// message hash back to the signing public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: U256,
    pub s: U256,
    /// 0-3: bit 0 is the y-parity of the nonce point, bit 1 marks that `r`
    /// was reduced mod `n` (i.e. the true x-coordinate was `r + n`).
    pub recovery_id: u8,
}

impl Signature {
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        der::encode(&self.r, &self.s)
    }

    pub fn from_der(bytes: &[u8]) -> Result<(U256, U256), Error> {
        der::decode_strict(bytes)
    }
}

fn hash_to_scalar(hash: &[u8; 32], curve: &CurveParams) -> U256 {
    reduce(&int_from_bits(hash, curve.nlen), &curve.n)
}

/// Half the curve order, rounded down: the low-s/high-s split point (BIP-62).
fn half_order(curve: &CurveParams) -> U256 {
    curve.n.shr1()
}

/// Sign `hash` with `key` using an RFC 6979 deterministic nonce, returning a
/// signature with `s` canonicalized to the lower half of `[1, n)` (BIP-62).
#[tracing::instrument(skip(key, hash), level = "debug")]
pub fn sign(key: &PrivateKey, hash: &[u8; 32]) -> Result<Signature, Error> {
    let curve = secp256k1();
    let x = key.scalar();
    let e = hash_to_scalar(hash, &curve);

    let k = generate_k(&x, hash, &curve);
    let r_point = curve.generator_jacobian().scalar_mul(&k, &curve).to_affine(&curve);
    let (rx, ry) = match r_point {
        Affine::Point { x, y } => (x, y),
        Affine::Infinity => return Err(Error::runtime("nonce point was the point at infinity")),
    };

    let r = reduce(&rx, &curve.n);
    if r.is_zero() {
        return Err(Error::runtime("signature r was zero; retry with a different nonce"));
    }
    let x_overflow = rx != r;

    let k_inv = mod_inv(&k, &curve.n)?;
    let rx_key = mul_mod(&r, &x, &curve.n);
    let s = mul_mod(&k_inv, &add_mod(&e, &rx_key, &curve.n), &curve.n);
    if s.is_zero() {
        return Err(Error::runtime("signature s was zero; retry with a different nonce"));
    }

    let y_is_odd = ry.0[0] & 1 == 1;
    let half = half_order(&curve);
    let (s, flipped_parity) = if s > half {
        (sub_mod(&curve.n, &s, &curve.n), true)
    } else {
        (s, false)
    };
    let y_odd_final = y_is_odd ^ flipped_parity;

    let mut recovery_id = u8::from(y_odd_final);
    if x_overflow {
        recovery_id |= 0b10;
    }

    tracing::debug!(recovery_id, "produced ECDSA signature");
    Ok(Signature { r, s, recovery_id })
}

/// Verify `sig` against `hash` under `pubkey`. Never panics and never
/// propagates an error: any malformed input is simply "not valid".
#[must_use]
pub fn verify(pubkey: &PublicKey, hash: &[u8; 32], sig: &Signature) -> bool {
    let curve = secp256k1();
    if sig.r.is_zero() || sig.r >= curve.n || sig.s.is_zero() || sig.s >= curve.n {
        return false;
    }
    let Ok(s_inv) = mod_inv(&sig.s, &curve.n) else {
        return false;
    };
    let e = hash_to_scalar(hash, &curve);
    let u1 = mul_mod(&e, &s_inv, &curve.n);
    let u2 = mul_mod(&sig.r, &s_inv, &curve.n);

    let point = double_scalar_mul(
        &u1,
        &curve.generator_jacobian(),
        &u2,
        &Jacobian::from_affine(&pubkey.point()),
        &curve,
    )
    .to_affine(&curve);

    match point {
        Affine::Infinity => false,
        Affine::Point { x, .. } => reduce(&x, &curve.n) == sig.r,
    }
}

/// Recover the public key that could have produced `sig` over `hash`, given
/// the signature's recovery id.
pub fn recover(hash: &[u8; 32], sig: &Signature) -> Result<PublicKey, Error> {
    let curve = secp256k1();
    if sig.r.is_zero() || sig.s.is_zero() {
        return Err(Error::value("signature r and s must be nonzero"));
    }

    let x_overflow = sig.recovery_id & 0b10 != 0;
    let want_even_y = sig.recovery_id & 0b01 == 0;

    let x = if x_overflow {
        let (sum, carry) = sig.r.overflowing_add(&curve.n);
        if carry || sum >= curve.p {
            return Err(Error::value("recovery id implies an x-coordinate past the field prime"));
        }
        sum
    } else {
        sig.r
    };

    let r_point = lift_x(&x, want_even_y, &curve).ok_or_else(|| Error::value("recovery id does not lift to a curve point"))?;
    let e = hash_to_scalar(hash, &curve);
    let r_inv = mod_inv(&sig.r, &curve.n)?;

    let u1 = neg_mod(&mul_mod(&e, &r_inv, &curve.n), &curve.n);
    let u2 = mul_mod(&sig.s, &r_inv, &curve.n);

    let q = double_scalar_mul(
        &u1,
        &curve.generator_jacobian(),
        &u2,
        &Jacobian::from_affine(&r_point),
        &curve,
    )
    .to_affine(&curve);

    PublicKey::from_point(q, true)
}

/// Try every recovery id (0-3) and return the public keys for which the
/// reconstructed point both lifts and verifies. Used when the signer's
/// recovery id wasn't transmitted alongside `(r, s)`.
#[must_use]
pub fn recover_all(hash: &[u8; 32], r: &U256, s: &U256) -> Vec<PublicKey> {
    (0u8..4)
        .filter_map(|id| {
            let sig = Signature { r: *r, s: *s, recovery_id: id };
            recover(hash, &sig).ok().filter(|pk| verify(pk, hash, &sig))
        })
        .collect()
}

/// Recover the private key and nonce from two signatures that reused the
/// same nonce (hence the same `r`) over two different messages — the
/// classic ECDSA nonce-reuse break. Returns `(private_key, nonce)`.
pub fn crack(hash1: &[u8; 32], sig1: &Signature, hash2: &[u8; 32], sig2: &Signature) -> Result<(U256, U256), Error> {
    let curve = secp256k1();
    if sig1.r != sig2.r {
        return Err(Error::value("signatures do not share a nonce (r values differ)"));
    }
    if sig1.s == sig2.s {
        return Err(Error::value("signatures are identical; cannot recover the nonce"));
    }

    let c1 = hash_to_scalar(hash1, &curve);
    let c2 = hash_to_scalar(hash2, &curve);
    if c1 == c2 {
        return Err(Error::value("signatures are over the same challenge; cannot recover the nonce"));
    }

    let s_diff = sub_mod(&sig1.s, &sig2.s, &curve.n);
    let s_diff_inv = mod_inv(&s_diff, &curve.n)?;
    let c_diff = sub_mod(&c1, &c2, &curve.n);
    let k = mul_mod(&c_diff, &s_diff_inv, &curve.n);

    let r_inv = mod_inv(&sig1.r, &curve.n)?;
    let sk = mul_mod(&sig1.s, &k, &curve.n);
    let numerator = sub_mod(&sk, &c1, &curve.n);
    let q = mul_mod(&numerator, &r_inv, &curve.n);

    if q.is_zero() {
        return Err(Error::runtime("recovered private key is zero"));
    }
    Ok((q, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Network;

    #[test]
    fn sign_then_verify_round_trips() {
        let key = PrivateKey::from_scalar(&U256::from_u64(12345), true, Network::Mainnet).unwrap();
        let hash = crate::hash::sha256(b"hello world");
        let sig = sign(&key, &hash).unwrap();
        assert!(verify(&key.public_key(), &hash, &sig));
    }

    #[test]
    fn signature_is_low_s() {
        let key = PrivateKey::from_scalar(&U256::from_u64(999_983), true, Network::Mainnet).unwrap();
        let hash = crate::hash::sha256(b"canonical s");
        let sig = sign(&key, &hash).unwrap();
        let curve = secp256k1();
        assert!(sig.s <= half_order(&curve));
    }

    #[test]
    fn verify_rejects_tampered_hash() {
        let key = PrivateKey::from_scalar(&U256::from_u64(42), true, Network::Mainnet).unwrap();
        let hash = crate::hash::sha256(b"original message");
        let sig = sign(&key, &hash).unwrap();
        let other_hash = crate::hash::sha256(b"tampered message");
        assert!(!verify(&key.public_key(), &other_hash, &sig));
    }

    #[test]
    fn recover_finds_the_signing_key() {
        let key = PrivateKey::from_scalar(&U256::from_u64(777), true, Network::Mainnet).unwrap();
        let hash = crate::hash::sha256(b"recover me");
        let sig = sign(&key, &hash).unwrap();
        let recovered = recover(&hash, &sig).unwrap();
        assert_eq!(recovered.point(), key.public_key().point());
    }

    #[test]
    fn recover_all_includes_the_signing_key_among_candidates() {
        let key = PrivateKey::from_scalar(&U256::from_u64(314_159), true, Network::Mainnet).unwrap();
        let hash = crate::hash::sha256(b"candidates");
        let sig = sign(&key, &hash).unwrap();
        let candidates = recover_all(&hash, &sig.r, &sig.s);
        assert!(candidates.iter().any(|pk| pk.point() == key.public_key().point()));
    }

    #[test]
    fn crack_recovers_private_key_from_nonce_reuse() {
        let key = PrivateKey::from_scalar(&U256::from_u64(2_024_001), true, Network::Mainnet).unwrap();
        let curve = secp256k1();
        let x = key.scalar();

        let hash1 = crate::hash::sha256(b"message one");
        let hash2 = crate::hash::sha256(b"message two");

        // Force a shared nonce by signing through the same k twice instead
        // of the deterministic RFC 6979 derivation (which would pick
        // different k's for different messages).
        let k = generate_k(&x, &hash1, &curve);
        let make_sig = |hash: &[u8; 32]| -> Signature {
            let r_point = curve.generator_jacobian().scalar_mul(&k, &curve).to_affine(&curve);
            let rx = r_point.x().unwrap();
            let r = reduce(&rx, &curve.n);
            let e = hash_to_scalar(hash, &curve);
            let k_inv = mod_inv(&k, &curve.n).unwrap();
            let s = mul_mod(&k_inv, &add_mod(&e, &mul_mod(&r, &x, &curve.n), &curve.n), &curve.n);
            Signature { r, s, recovery_id: 0 }
        };

        let sig1 = make_sig(&hash1);
        let sig2 = make_sig(&hash2);

        let (recovered_key, recovered_nonce) = crack(&hash1, &sig1, &hash2, &sig2).unwrap();
        assert_eq!(recovered_key, x);
        assert_eq!(recovered_nonce, k);
    }
}
