//! Short-Weierstrass curve arithmetic: affine/Jacobian points and the
//! secp256k1 parameter set.

pub mod affine;
pub mod jacobian;
pub mod params;

pub use affine::{is_on_curve, lift_x, Affine};
pub use jacobian::{double_scalar_mul, Jacobian};
pub use params::{secp256k1, CurveParams};
