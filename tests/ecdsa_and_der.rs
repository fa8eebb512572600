use rstest::rstest;
use txforge::der;
use txforge::ecdsa::{crack, recover, recover_all, sign, verify, Signature};
use txforge::hash::sha256;
use txforge::keys::{Network, PrivateKey};
use txforge::num::{mod_inv, mul_mod, sub_mod, U256};
use txforge::curve::secp256k1;

fn key_from_u64(n: u64) -> PrivateKey {
    PrivateKey::from_scalar(&U256::from_u64(n), true, Network::Mainnet).unwrap()
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(1000)]
#[case(999_983)]
#[case(123_456_789)]
fn sign_verify_recover_round_trip_for_many_keys(#[case] scalar: u64) {
    let key = key_from_u64(scalar);
    let hash = sha256(format!("message for key {scalar}").as_bytes());
    let sig = sign(&key, &hash).unwrap();

    let curve = secp256k1();
    assert!(!sig.r.is_zero() && sig.r < curve.n);
    assert!(!sig.s.is_zero() && sig.s <= curve.n.shr1());

    assert!(verify(&key.public_key(), &hash, &sig));

    let recovered = recover(&hash, &sig).unwrap();
    assert_eq!(recovered.point(), key.public_key().point());

    let candidates = recover_all(&hash, &sig.r, &sig.s);
    assert!(candidates.iter().any(|pk| pk.point() == key.public_key().point()));
}

#[test]
fn signature_der_round_trips() {
    let key = key_from_u64(31337);
    let hash = sha256(b"der round trip");
    let sig = sign(&key, &hash).unwrap();
    let der_bytes = sig.to_der();
    let (r, s) = Signature::from_der(&der_bytes).unwrap();
    assert_eq!(r, sig.r);
    assert_eq!(s, sig.s);
}

#[test]
fn der_bit_flip_in_length_byte_is_rejected() {
    let key = key_from_u64(7);
    let hash = sha256(b"tamper test");
    let sig = sign(&key, &hash).unwrap();
    let mut der_bytes = sig.to_der();
    der_bytes[1] ^= 0x01;
    assert!(der::decode_strict(&der_bytes).is_err());
}

#[test]
fn der_extra_leading_zero_is_rejected() {
    let key = key_from_u64(9);
    let hash = sha256(b"padding test");
    let sig = sign(&key, &hash).unwrap();
    let mut der_bytes = sig.to_der();
    // bump the outer and r-integer lengths, then splice in an unjustified 0x00
    der_bytes[1] += 1;
    der_bytes[3] += 1;
    der_bytes.insert(4, 0x00);
    assert!(der::decode_strict(&der_bytes).is_err());
}

#[test]
fn crack_recovers_key_from_forced_nonce_reuse() {
    let key = key_from_u64(2_024_007);
    let curve = secp256k1();
    let x = key.scalar();
    let k = U256::from_u64(424_242);

    let make_sig = |msg: &[u8]| -> Signature {
        let hash = sha256(msg);
        let r_point = curve.generator_jacobian().scalar_mul(&k, &curve).to_affine(&curve);
        let r = r_point.x().unwrap();
        let e = txforge::num::reduce(&txforge::num::int_from_bits(&hash, curve.nlen), &curve.n);
        let k_inv = mod_inv(&k, &curve.n).unwrap();
        let s = mul_mod(&k_inv, &txforge::num::add_mod(&e, &mul_mod(&r, &x, &curve.n), &curve.n), &curve.n);
        Signature { r, s, recovery_id: 0 }
    };

    let sig1 = make_sig(b"message alpha");
    let sig2 = make_sig(b"message beta");

    let (recovered_key, recovered_nonce) = crack(&sha256(b"message alpha"), &sig1, &sha256(b"message beta"), &sig2).unwrap();
    assert_eq!(recovered_key, x);
    assert_eq!(recovered_nonce, k);
}

#[test]
fn verify_never_panics_on_malformed_signature() {
    let key = key_from_u64(5);
    let hash = sha256(b"garbage signature");
    let bogus = Signature {
        r: U256::ZERO,
        s: U256::ONE,
        recovery_id: 0,
    };
    assert!(!verify(&key.public_key(), &hash, &bogus));

    let curve = secp256k1();
    let oversized = Signature {
        r: sub_mod(&curve.n, &U256::ONE, &curve.n),
        s: curve.n,
        recovery_id: 0,
    };
    assert!(!verify(&key.public_key(), &hash, &oversized));
}
