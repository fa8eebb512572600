//! Jacobian projective coordinates and scalar multiplication.
//!
//! A Jacobian point `(X, Y, Z)` represents the affine point `(X/Z^2, Y/Z^3)`;
//! `Z == 0` represents infinity. Staying in this representation through a
//! whole scalar multiplication avoids a field inversion per step — only the
//! final conversion back to [`Affine`] needs one.

use crate::curve::affine::Affine;
use crate::curve::params::CurveParams;
use crate::num::{add_mod, mod_inv, mul_mod, neg_mod, sub_mod, U256};

#[derive(Clone, Copy, Debug)]
pub struct Jacobian {
    pub x: U256,
    pub y: U256,
    pub z: U256,
}

impl Jacobian {
    #[must_use]
    pub fn infinity() -> Jacobian {
        Jacobian {
            x: U256::ONE,
            y: U256::ONE,
            z: U256::ZERO,
        }
    }

    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    #[must_use]
    pub fn from_affine(p: &Affine) -> Jacobian {
        match p {
            Affine::Infinity => Jacobian::infinity(),
            Affine::Point { x, y } => Jacobian {
                x: *x,
                y: *y,
                z: U256::ONE,
            },
        }
    }

    /// Convert back to affine form. Requires one modular inversion.
    #[must_use]
    pub fn to_affine(&self, curve: &CurveParams) -> Affine {
        if self.is_infinity() {
            return Affine::Infinity;
        }
        let z_inv = mod_inv(&self.z, &curve.p).expect("jacobian z is nonzero and p is prime");
        let z_inv2 = mul_mod(&z_inv, &z_inv, &curve.p);
        let z_inv3 = mul_mod(&z_inv2, &z_inv, &curve.p);
        Affine::Point {
            x: mul_mod(&self.x, &z_inv2, &curve.p),
            y: mul_mod(&self.y, &z_inv3, &curve.p),
        }
    }

    /// Point doubling, valid for any curve parameter `a` (not just secp256k1's `a = 0`).
    #[must_use]
    pub fn double(&self, curve: &CurveParams) -> Jacobian {
        let p = &curve.p;
        if self.is_infinity() || self.y.is_zero() {
            return Jacobian::infinity();
        }

        let xx = mul_mod(&self.x, &self.x, p);
        let yy = mul_mod(&self.y, &self.y, p);
        let yyyy = mul_mod(&yy, &yy, p);
        let zz = mul_mod(&self.z, &self.z, p);

        let s = {
            let xplusyy = add_mod(&self.x, &yy, p);
            let t = mul_mod(&xplusyy, &xplusyy, p);
            let t = sub_mod(&t, &xx, p);
            let t = sub_mod(&t, &yyyy, p);
            add_mod(&t, &t, p)
        };

        let zz2 = mul_mod(&zz, &zz, p);
        let a_zz2 = mul_mod(&curve.a, &zz2, p);
        let m = add_mod(&add_mod(&xx, &xx, p), &add_mod(&xx, &a_zz2, p), p);

        let t = sub_mod(&mul_mod(&m, &m, p), &add_mod(&s, &s, p), p);
        let x3 = t;

        let yyyy8 = {
            let d = add_mod(&yyyy, &yyyy, p);
            let d = add_mod(&d, &d, p);
            add_mod(&d, &d, p)
        };
        let y3 = sub_mod(&mul_mod(&m, &sub_mod(&s, &x3, p), p), &yyyy8, p);

        let yz = mul_mod(&self.y, &self.z, p);
        let z3 = add_mod(&yz, &yz, p);

        Jacobian { x: x3, y: y3, z: z3 }
    }

    /// General Jacobian addition. Falls back to doubling when `self == other`.
    #[must_use]
    pub fn add(&self, other: &Jacobian, curve: &CurveParams) -> Jacobian {
        let p = &curve.p;
        if self.is_infinity() {
            return *other;
        }
        if other.is_infinity() {
            return *self;
        }

        let z1z1 = mul_mod(&self.z, &self.z, p);
        let z2z2 = mul_mod(&other.z, &other.z, p);
        let u1 = mul_mod(&self.x, &z2z2, p);
        let u2 = mul_mod(&other.x, &z1z1, p);
        let s1 = mul_mod(&mul_mod(&self.y, &other.z, p), &z2z2, p);
        let s2 = mul_mod(&mul_mod(&other.y, &self.z, p), &z1z1, p);

        if u1 == u2 {
            return if s1 == s2 {
                self.double(curve)
            } else {
                Jacobian::infinity()
            };
        }

        let h = sub_mod(&u2, &u1, p);
        let i = mul_mod(&add_mod(&h, &h, p), &add_mod(&h, &h, p), p);
        let j = mul_mod(&h, &i, p);
        let r = add_mod(&sub_mod(&s2, &s1, p), &sub_mod(&s2, &s1, p), p);
        let v = mul_mod(&u1, &i, p);

        let x3 = sub_mod(&sub_mod(&mul_mod(&r, &r, p), &j, p), &add_mod(&v, &v, p), p);
        let y3 = sub_mod(
            &mul_mod(&r, &sub_mod(&v, &x3, p), p),
            &add_mod(&mul_mod(&s1, &j, p), &mul_mod(&s1, &j, p), p),
            p,
        );
        let z_sum = add_mod(&self.z, &other.z, p);
        let z3 = sub_mod(&sub_mod(&mul_mod(&z_sum, &z_sum, p), &z1z1, p), &z2z2, p);
        let z3 = mul_mod(&z3, &h, p);

        Jacobian { x: x3, y: y3, z: z3 }
    }

    #[must_use]
    pub fn negate(&self, curve: &CurveParams) -> Jacobian {
        Jacobian {
            x: self.x,
            y: neg_mod(&self.y, &curve.p),
            z: self.z,
        }
    }

    /// Montgomery-ladder scalar multiplication.
    ///
    /// Walks every bit of `n`'s width (not just the scalar's own bit length)
    /// and performs exactly one addition and one doubling per bit regardless
    /// of whether that bit is set, so neither the scalar's bit length nor its
    /// individual bit values show up as a difference in operation count.
    #[must_use]
    pub fn scalar_mul(&self, scalar: &U256, curve: &CurveParams) -> Jacobian {
        let mut r0 = Jacobian::infinity();
        let mut r1 = *self;
        for i in (0..curve.nlen).rev() {
            if scalar.bit(i) {
                r0 = r0.add(&r1, curve);
                r1 = r1.double(curve);
            } else {
                r1 = r0.add(&r1, curve);
                r0 = r0.double(curve);
            }
        }
        r0
    }
}

/// Shamir's trick: compute `u1*p1 + u2*p2` with one combined ladder instead
/// of two independent scalar multiplications followed by an addition.
#[must_use]
pub fn double_scalar_mul(
    u1: &U256,
    p1: &Jacobian,
    u2: &U256,
    p2: &Jacobian,
    curve: &CurveParams,
) -> Jacobian {
    let sum = p1.add(p2, curve);
    let mut acc = Jacobian::infinity();
    for i in (0..curve.nlen).rev() {
        acc = acc.double(curve);
        match (u1.bit(i), u2.bit(i)) {
            (true, true) => acc = acc.add(&sum, curve),
            (true, false) => acc = acc.add(p1, curve),
            (false, true) => acc = acc.add(p2, curve),
            (false, false) => {}
        }
    }
    acc
}
