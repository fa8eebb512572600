//! SEC1 public-key encoding and the private-key wrapper (scalar / raw bytes
//! / WIF all parse through one normalizing path).

use crate::base58;
use crate::curve::{is_on_curve, lift_x, secp256k1, Affine, CurveParams};
use crate::error::Error;
use crate::num::{reduce, U256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Which network a WIF-encoded key or address belongs to; selects the
/// version byte prepended before Base58Check encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    #[must_use]
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet => 0xef,
        }
    }

    #[must_use]
    pub fn p2pkh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    #[must_use]
    pub fn p2sh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet => 0xc4,
        }
    }

    #[must_use]
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet => "tb",
        }
    }
}

/// A secp256k1 private key: a scalar in `[1, n)` plus the metadata (network,
/// compression preference) needed to round-trip through WIF.
///
/// Wraps its scalar in [`zeroize::Zeroize`] so the secret bytes don't linger
/// in memory once the key is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    scalar_bytes: [u8; 32],
    #[zeroize(skip)]
    compressed: bool,
    #[zeroize(skip)]
    network: Network,
}

impl PrivateKey {
    /// Construct from a raw scalar, rejecting zero and values `>= n`.
    pub fn from_scalar(scalar: &U256, compressed: bool, network: Network) -> Result<Self, Error> {
        let curve = secp256k1();
        if scalar.is_zero() || *scalar >= curve.n {
            return Err(Error::value("private key scalar out of range"));
        }
        Ok(PrivateKey {
            scalar_bytes: scalar.to_be_bytes(),
            compressed,
            network,
        })
    }

    pub fn from_bytes(bytes: &[u8], compressed: bool, network: Network) -> Result<Self, Error> {
        if bytes.len() != 32 {
            return Err(Error::value("private key must be exactly 32 bytes"));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Self::from_scalar(&U256::from_be_bytes(&arr), compressed, network)
    }

    /// Parse a WIF-encoded key, recovering network and compression flag from it.
    pub fn from_wif(wif: &str) -> Result<Self, Error> {
        let payload = base58::decode_check(wif)?;
        if payload.len() != 33 && payload.len() != 34 {
            return Err(Error::value("WIF payload has unexpected length"));
        }
        let network = match payload[0] {
            0x80 => Network::Mainnet,
            0xef => Network::Testnet,
            other => return Err(Error::value(format!("unrecognized WIF version byte {other:#04x}"))),
        };
        let compressed = match payload.len() {
            33 => false,
            34 if payload[33] == 0x01 => true,
            _ => return Err(Error::value("WIF compression suffix must be 0x01")),
        };
        Self::from_bytes(&payload[1..33], compressed, network)
    }

    #[must_use]
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(34);
        payload.push(self.network.wif_prefix());
        payload.extend_from_slice(&self.scalar_bytes);
        if self.compressed {
            payload.push(0x01);
        }
        base58::encode_check(&payload)
    }

    #[must_use]
    pub fn scalar(&self) -> U256 {
        U256::from_be_bytes(&self.scalar_bytes)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.scalar_bytes
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        let curve = secp256k1();
        let point = curve
            .generator_jacobian()
            .scalar_mul(&self.scalar(), &curve)
            .to_affine(&curve);
        PublicKey {
            point,
            compressed: self.compressed,
        }
    }
}

/// A secp256k1 public key: a curve point plus its preferred SEC1 serialization form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    point: Affine,
    compressed: bool,
}

impl PublicKey {
    pub fn from_point(point: Affine, compressed: bool) -> Result<Self, Error> {
        if point.is_infinity() {
            return Err(Error::value("public key cannot be the point at infinity"));
        }
        let curve = secp256k1();
        if !is_on_curve(&point, &curve) {
            return Err(Error::value("public key point is not on the curve"));
        }
        Ok(PublicKey { point, compressed })
    }

    #[must_use]
    pub fn point(&self) -> Affine {
        self.point
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// SEC1 encode: 33 bytes (`02`/`03` prefix) if compressed, else 65 (`04` prefix).
    #[must_use]
    pub fn to_sec1(&self) -> Vec<u8> {
        encode_point(&self.point, self.compressed)
    }

    /// Parse a SEC1-encoded point, rejecting the point at infinity and
    /// points with bad parity/coordinates.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, Error> {
        let point = decode_point(bytes, &secp256k1())?;
        let compressed = bytes.len() == 33;
        PublicKey::from_point(point, compressed)
    }
}

#[must_use]
pub fn encode_point(point: &Affine, compressed: bool) -> Vec<u8> {
    match point {
        Affine::Infinity => vec![0x00],
        Affine::Point { x, y } => {
            let x_bytes = x.to_be_bytes();
            if compressed {
                let mut out = Vec::with_capacity(33);
                out.push(if y.0[0] & 1 == 0 { 0x02 } else { 0x03 });
                out.extend_from_slice(&x_bytes);
                out
            } else {
                let mut out = Vec::with_capacity(65);
                out.push(0x04);
                out.extend_from_slice(&x_bytes);
                out.extend_from_slice(&y.to_be_bytes());
                out
            }
        }
    }
}

pub fn decode_point(bytes: &[u8], curve: &CurveParams) -> Result<Affine, Error> {
    match bytes.first() {
        Some(0x00) if bytes.len() == 1 => Err(Error::value("point at infinity is not a valid public key")),
        Some(0x02) | Some(0x03) if bytes.len() == 33 => {
            let want_even = bytes[0] == 0x02;
            let mut x_bytes = [0u8; 32];
            x_bytes.copy_from_slice(&bytes[1..33]);
            let x = reduce(&U256::from_be_bytes(&x_bytes), &curve.p);
            lift_x(&x, want_even, curve).ok_or_else(|| Error::value("x-coordinate is not on the curve"))
        }
        Some(0x04) if bytes.len() == 65 => {
            let mut x_bytes = [0u8; 32];
            let mut y_bytes = [0u8; 32];
            x_bytes.copy_from_slice(&bytes[1..33]);
            y_bytes.copy_from_slice(&bytes[33..65]);
            let point = Affine::Point {
                x: U256::from_be_bytes(&x_bytes),
                y: U256::from_be_bytes(&y_bytes),
            };
            if is_on_curve(&point, curve) {
                Ok(point)
            } else {
                Err(Error::value("uncompressed point is not on the curve"))
            }
        }
        _ => Err(Error::value("unrecognized public key encoding")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_round_trips_through_wif() {
        let key = PrivateKey::from_scalar(&U256::from_u64(1), true, Network::Mainnet).unwrap();
        let wif = key.to_wif();
        let parsed = PrivateKey::from_wif(&wif).unwrap();
        assert_eq!(parsed.scalar(), key.scalar());
        assert!(parsed.is_compressed());
        assert_eq!(parsed.network(), Network::Mainnet);
    }

    #[test]
    fn rejects_zero_scalar() {
        assert!(PrivateKey::from_scalar(&U256::ZERO, true, Network::Mainnet).is_err());
    }

    #[test]
    fn public_key_round_trips_compressed_and_uncompressed() {
        let key = PrivateKey::from_scalar(&U256::from_u64(2), true, Network::Mainnet).unwrap();
        let pubkey = key.public_key();
        let compressed = pubkey.to_sec1();
        assert_eq!(compressed.len(), 33);
        let parsed = PublicKey::from_sec1(&compressed).unwrap();
        assert_eq!(parsed.point(), pubkey.point());

        let uncompressed = encode_point(&pubkey.point(), false);
        assert_eq!(uncompressed.len(), 65);
        let parsed_uncompressed = PublicKey::from_sec1(&uncompressed).unwrap();
        assert_eq!(parsed_uncompressed.point(), pubkey.point());
    }

    #[test]
    fn rejects_point_at_infinity() {
        assert!(PublicKey::from_point(Affine::Infinity, true).is_err());
    }
}
