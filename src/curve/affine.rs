//! Affine point representation.
//!
//! The point at infinity is a dedicated enum variant, never a sentinel
//! coordinate pair, so there is no representable affine point that is
//! simultaneously "on the curve" and "at infinity" by accident.

use crate::curve::params::CurveParams;
use crate::num::{add_mod, mod_sqrt, mul_mod, neg_mod, sub_mod, U256};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affine {
    Infinity,
    Point { x: U256, y: U256 },
}

impl Affine {
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        matches!(self, Affine::Infinity)
    }

    #[must_use]
    pub fn negate(&self, curve: &CurveParams) -> Affine {
        match self {
            Affine::Infinity => Affine::Infinity,
            Affine::Point { x, y } => Affine::Point {
                x: *x,
                y: neg_mod(y, &curve.p),
            },
        }
    }

    #[must_use]
    pub fn x(&self) -> Option<U256> {
        match self {
            Affine::Infinity => None,
            Affine::Point { x, .. } => Some(*x),
        }
    }

    #[must_use]
    pub fn y(&self) -> Option<U256> {
        match self {
            Affine::Infinity => None,
            Affine::Point { y, .. } => Some(*y),
        }
    }
}

/// `y^2 = x^3 + a*x + b (mod p)` right-hand side.
fn rhs(x: &U256, curve: &CurveParams) -> U256 {
    let x2 = mul_mod(x, x, &curve.p);
    let x3 = mul_mod(&x2, x, &curve.p);
    let ax = mul_mod(&curve.a, x, &curve.p);
    add_mod(&add_mod(&x3, &ax, &curve.p), &curve.b, &curve.p)
}

#[must_use]
pub fn is_on_curve(point: &Affine, curve: &CurveParams) -> bool {
    match point {
        Affine::Infinity => true,
        Affine::Point { x, y } => mul_mod(y, y, &curve.p) == rhs(x, curve),
    }
}

/// Recover the point with the given x-coordinate and the requested y-parity.
///
/// Returns `None` if `x` is not on the curve (the right-hand side is not a
/// quadratic residue mod `p`).
#[must_use]
pub fn lift_x(x: &U256, want_even_y: bool, curve: &CurveParams) -> Option<Affine> {
    let y2 = rhs(x, curve);
    let y = mod_sqrt(&y2, &curve.p).ok()?;
    let y_is_even = y.0[0] & 1 == 0;
    let y = if y_is_even == want_even_y {
        y
    } else {
        sub_mod(&curve.p, &y, &curve.p)
    };
    Some(Affine::Point { x: *x, y })
}
