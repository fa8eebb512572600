//! Modular arithmetic on top of [`U256`]: reduction, inversion, and square roots.
//!
//! These are generic over the modulus so the same routines serve both the
//! field (mod *p*) and the scalar field (mod *n*); `secp256k1` happens to use
//! the same representation for both.

use crate::error::Error;
use crate::num::uint256::{U256, U512};

/// Reduce a double-width product modulo `m` by binary long division.
///
/// This is not the fastest approach available for a modulus as close to a
/// power of two as secp256k1's, but it is modulus-agnostic, easy to verify,
/// and runs in time independent of the operands' values (only of their bit
/// lengths, which are public).
fn reduce_wide(mut x: U512, m: &U256) -> U256 {
    let m_wide = U512::from_u256(m);
    let m_bits = m.bit_length().expect("modulus must be nonzero");
    loop {
        let Some(x_bits) = x.bit_length() else {
            return U256::ZERO;
        };
        if x_bits < m_bits {
            return x.low256();
        }
        let shift = x_bits - m_bits;
        let shifted = m_wide.shl(shift);
        let (diff, borrow) = x.overflowing_sub(&shifted);
        x = if borrow { x } else { diff };
        if shift == 0 {
            return x.low256();
        }
    }
}

/// Reduce `x` into the canonical representative in `[0, m)`.
#[must_use]
pub fn reduce(x: &U256, m: &U256) -> U256 {
    if x < m {
        return *x;
    }
    reduce_wide(U512::from_u256(x), m)
}

#[must_use]
pub fn add_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (sum, carry) = a.overflowing_add(b);
    if carry {
        // sum overflowed 256 bits; the true value is sum + 2^256, which is
        // congruent to sum - (2^256 - reduce-friendly), so fold it back in
        // via the wide reducer instead of trying to special-case the carry.
        let mut wide = U512::from_u256(&sum);
        wide.0[4] = 1;
        return reduce_wide(wide, m);
    }
    reduce(&sum, m)
}

#[must_use]
pub fn sub_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (diff, borrow) = a.overflowing_sub(b);
    if borrow {
        let (wrapped, _) = diff.overflowing_add(m);
        reduce(&wrapped, m)
    } else {
        reduce(&diff, m)
    }
}

#[must_use]
pub fn neg_mod(a: &U256, m: &U256) -> U256 {
    if a.is_zero() {
        U256::ZERO
    } else {
        sub_mod(m, a, m)
    }
}

#[must_use]
pub fn mul_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    reduce_wide(a.widening_mul(b), m)
}

#[must_use]
pub fn pow_mod(base: &U256, exponent: &U256, m: &U256) -> U256 {
    let mut result = U256::ONE;
    let mut base = reduce(base, m);
    let bits = exponent.bit_length().unwrap_or(0);
    for i in 0..bits {
        if exponent.bit(i) {
            result = mul_mod(&result, &base, m);
        }
        base = mul_mod(&base, &base, m);
    }
    result
}

/// Extended Euclidean algorithm: returns `x` in `[1, m)` with `a*x ≡ 1 (mod m)`.
///
/// Fails with [`Error::runtime`] if `a` is not invertible mod `m` (i.e.
/// `gcd(a, m) != 1`), which includes `a == 0`.
pub fn mod_inv(a: &U256, m: &U256) -> Result<U256, Error> {
    if a.is_zero() {
        return Err(Error::runtime("mod_inv argument is not coprime with modulus"));
    }

    // Signed extended Euclid, tracked as (magnitude, is_negative) pairs since
    // U256 has no sign bit of its own.
    let (mut old_r, mut r) = (*m, reduce(a, m));
    let (mut old_s, mut s, mut old_s_neg, mut s_neg) = (U256::ZERO, U256::ONE, false, false);

    while !r.is_zero() {
        let (quotient, remainder) = div_rem(&old_r, &r);
        old_r = r;
        r = remainder;

        let prod = mul_mod(&quotient, &s, m);
        let (new_s, new_neg) = signed_sub(old_s, old_s_neg, prod, s_neg, m);
        old_s = s;
        old_s_neg = s_neg;
        s = new_s;
        s_neg = new_neg;
        let _ = quotient;
    }

    if old_r != U256::ONE {
        return Err(Error::runtime("mod_inv argument is not coprime with modulus"));
    }

    Ok(if old_s_neg {
        sub_mod(m, &old_s, m)
    } else {
        reduce(&old_s, m)
    })
}

/// `a - sign(a)*b` combined under a common modulus, returning `(magnitude, is_negative)`.
fn signed_sub(a: U256, a_neg: bool, b: U256, b_neg: bool, m: &U256) -> (U256, bool) {
    // Treat both operands as elements of Z (not Z/mZ) represented by
    // (magnitude, sign), add -b, and renormalize the magnitude mod m only at
    // the end so intermediate bookkeeping stays exact.
    if a_neg == b_neg {
        // |a| - |b| with shared sign a_neg XOR (subtraction flips b's effective sign)
        if a >= b {
            (reduce(&a.overflowing_sub(&b).0, m), a_neg)
        } else {
            (reduce(&b.overflowing_sub(&a).0, m), !a_neg)
        }
    } else {
        (reduce(&a.overflowing_add(&b).0, m), a_neg)
    }
}

/// Plain integer division with remainder (not modular): `a = q*b + r`, `0 <= r < b`.
fn div_rem(a: &U256, b: &U256) -> (U256, U256) {
    if b.is_zero() {
        return (U256::ZERO, *a);
    }
    let mut quotient = U256::ZERO;
    let mut remainder = U256::ZERO;
    let bits = a.bit_length().unwrap_or(0);
    for i in (0..bits).rev() {
        // `remainder < b <= U256::MAX/2` is an invariant maintained below, so
        // this shift never actually overflows 256 bits.
        let (shifted, _overflow) = remainder.shl1();
        remainder = shifted;
        if a.bit(i) {
            remainder.0[0] |= 1;
        }
        if remainder >= *b {
            remainder = remainder.overflowing_sub(b).0;
            quotient_set_bit(&mut quotient, i);
        }
    }
    (quotient, remainder)
}

fn quotient_set_bit(q: &mut U256, index: u32) {
    let limb = (index / 64) as usize;
    let offset = index % 64;
    if limb < 4 {
        q.0[limb] |= 1 << offset;
    }
}

/// Tonelli-Shanks square root mod a prime `p`.
///
/// secp256k1's field prime satisfies `p ≡ 3 (mod 4)`, so the fast path
/// `r = a^((p+1)/4) mod p` applies; the general Tonelli-Shanks loop is kept
/// for parameter sets where that shortcut doesn't hold.
pub fn mod_sqrt(a: &U256, p: &U256) -> Result<U256, Error> {
    let a = reduce(a, p);
    if a.is_zero() {
        return Ok(U256::ZERO);
    }

    if p.0[0] & 3 == 3 {
        let exponent = add_div4(p);
        let candidate = pow_mod(&a, &exponent, p);
        return if mul_mod(&candidate, &candidate, p) == a {
            Ok(candidate)
        } else {
            Err(Error::value("no square root exists"))
        };
    }

    tonelli_shanks_general(&a, p)
}

/// `(p + 1) / 4`, valid only when `p ≡ 3 (mod 4)`.
fn add_div4(p: &U256) -> U256 {
    let (sum, _) = p.overflowing_add(&U256::ONE);
    sum.shr1().shr1()
}

fn tonelli_shanks_general(a: &U256, p: &U256) -> Result<U256, Error> {
    // Factor p - 1 = q * 2^s with q odd.
    let p_minus_1 = p.overflowing_sub(&U256::ONE).0;
    let mut q = p_minus_1;
    let mut s = 0u32;
    while q.is_even() {
        q = q.shr1();
        s += 1;
    }

    // Euler's criterion confirms a is a quadratic residue before we search.
    let legendre_exp = p_minus_1.shr1();
    if pow_mod(a, &legendre_exp, p) != U256::ONE {
        return Err(Error::value("no square root exists"));
    }

    // Find a quadratic non-residue z.
    let mut z = U256::from_u64(2);
    while pow_mod(&z, &legendre_exp, p) != sub_mod(p, &U256::ONE, p) {
        z = add_mod(&z, &U256::ONE, p);
    }

    let mut m = s;
    let mut c = pow_mod(&z, &q, p);
    let (q_plus_1, _) = q.overflowing_add(&U256::ONE);
    let mut t = pow_mod(a, &q, p);
    let mut r = pow_mod(a, &q_plus_1.shr1(), p);

    loop {
        if t == U256::ONE {
            return Ok(r);
        }
        let mut i = 0u32;
        let mut t2i = t;
        while t2i != U256::ONE {
            t2i = mul_mod(&t2i, &t2i, p);
            i += 1;
            if i == m {
                return Err(Error::value("no square root exists"));
            }
        }
        let mut b = c;
        for _ in 0..(m - i - 1) {
            b = mul_mod(&b, &b, p);
        }
        let b2 = mul_mod(&b, &b, p);
        m = i;
        c = b2;
        t = mul_mod(&t, &b2, p);
        r = mul_mod(&r, &b, p);
    }
}

/// SEC 1 §2.3.8's `bits2int`: interpret the leftmost `nbits` bits of `buf` as
/// a big-endian integer. This is the only sanctioned path from a hash digest
/// to a scalar candidate (RFC 6979 and the ECDSA challenge both route
/// through it).
#[must_use]
pub fn int_from_bits(buf: &[u8], nbits: u32) -> U256 {
    let buf_bits = buf.len() as u32 * 8;
    let mut padded = [0u8; 32];
    let take = buf.len().min(32);
    padded[32 - take..].copy_from_slice(&buf[..take]);
    let mut x = U256::from_be_bytes(&padded);

    if buf_bits > nbits {
        let mut shift = buf_bits - nbits;
        while shift > 0 {
            x = x.shr1();
            shift -= 1;
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from_u64(v)
    }

    #[test]
    fn mod_inv_matches_known_answer() {
        // 3 * 4 = 12 ≡ 1 (mod 11)
        let inv = mod_inv(&u(3), &u(11)).unwrap();
        assert_eq!(inv, u(4));
    }

    #[test]
    fn mod_inv_rejects_non_coprime() {
        assert!(mod_inv(&u(4), &u(8)).is_err());
    }

    #[test]
    fn mod_sqrt_fast_path_roundtrips() {
        // p = 11 ≡ 3 mod 4; 5^2 = 25 ≡ 3 (mod 11)
        let root = mod_sqrt(&u(3), &u(11)).unwrap();
        assert_eq!(mul_mod(&root, &root, &u(11)), u(3));
    }

    #[test]
    fn pow_mod_matches_repeated_squaring() {
        assert_eq!(pow_mod(&u(2), &u(10), &u(1_000_000_007)), u(1024));
    }

    #[test]
    fn int_from_bits_truncates_to_requested_length() {
        let digest = [0xffu8; 32];
        let x = int_from_bits(&digest, 4);
        assert_eq!(x, u(0b1111));
    }
}
