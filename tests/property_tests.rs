//! Property-based checks of the quantified invariants. Scalars are drawn
//! from `1..=u64::MAX` rather than the full 256-bit range `[1, n)` — still a
//! huge space relative to a curve bug's usual fingerprint, and cheap enough
//! to exercise thousands of cases per run.

use proptest::prelude::*;

use txforge::curve::{is_on_curve, secp256k1};
use txforge::ecdsa::{recover_all, sign, verify};
use txforge::hash::sha256;
use txforge::keys::{Network, PrivateKey, PublicKey};
use txforge::num::U256;
use txforge::script::{classify, nulldata_script, p2pkh_script, p2sh_script, p2wpkh_script, p2wsh_script, ScriptPayload};
use txforge::transaction::{OutPoint, Transaction, TxIn, TxOut};

fn scalar_strategy() -> impl Strategy<Value = U256> {
    any::<u64>().prop_filter("scalar must be nonzero", |n| *n != 0).prop_map(U256::from_u64)
}

proptest! {
    #[test]
    fn key_generation_point_is_on_curve_and_sec_round_trips(scalar in scalar_strategy()) {
        let key = PrivateKey::from_scalar(&scalar, true, Network::Mainnet).unwrap();
        let pubkey = key.public_key();
        let curve = secp256k1();
        prop_assert!(is_on_curve(&pubkey.point(), &curve));

        let encoded = pubkey.to_sec1();
        let decoded = PublicKey::from_sec1(&encoded).unwrap();
        prop_assert_eq!(decoded.point(), pubkey.point());
    }

    #[test]
    fn ecdsa_round_trip_holds_for_arbitrary_scalar_and_message(
        scalar in scalar_strategy(),
        msg in ".{0,64}",
    ) {
        let key = PrivateKey::from_scalar(&scalar, true, Network::Mainnet).unwrap();
        let hash = sha256(msg.as_bytes());
        let sig = sign(&key, &hash).unwrap();

        prop_assert!(verify(&key.public_key(), &hash, &sig));

        let curve = secp256k1();
        prop_assert!(!sig.r.is_zero() && sig.r < curve.n);
        prop_assert!(!sig.s.is_zero() && sig.s <= curve.n.shr1());

        let candidates = recover_all(&hash, &sig.r, &sig.s);
        prop_assert!(candidates.iter().any(|pk| pk.point() == key.public_key().point()));
    }

    #[test]
    fn script_constructors_round_trip_through_classification(
        a in prop::array::uniform20(any::<u8>()),
        b in prop::array::uniform20(any::<u8>()),
        wsh in prop::array::uniform32(any::<u8>()),
        data in prop::collection::vec(any::<u8>(), 0..=80),
    ) {
        prop_assert_eq!(classify(&p2pkh_script(&a)), ScriptPayload::P2pkh(a));
        prop_assert_eq!(classify(&p2sh_script(&b)), ScriptPayload::P2sh(b));
        prop_assert_eq!(classify(&p2wpkh_script(&a)), ScriptPayload::P2wpkh(a));
        prop_assert_eq!(classify(&p2wsh_script(&wsh)), ScriptPayload::P2wsh(wsh));
        let nulldata = nulldata_script(&data).unwrap();
        prop_assert_eq!(classify(&nulldata), ScriptPayload::NullData(data));
    }

    #[test]
    fn tx_round_trip_is_identity_and_txid_ignores_witness(
        value in any::<u64>(),
        script in prop::collection::vec(any::<u8>(), 0..=40),
        witness_item in prop::collection::vec(any::<u8>(), 0..=40),
    ) {
        let mut tx = Transaction {
            version: 2,
            inputs: vec![TxIn {
                previous_output: OutPoint { txid: [0x07; 32], vout: 3 },
                script_sig: script.clone(),
                sequence: 0xffff_ffff,
                witness: Vec::new(),
            }],
            outputs: vec![TxOut { value, script_pubkey: script }],
            lock_time: 0,
        };

        let bytes = tx.serialize(true);
        let parsed = Transaction::deserialize(&bytes).unwrap();
        prop_assert_eq!(&parsed, &tx);

        let txid_before = tx.txid();
        tx.inputs[0].witness = vec![witness_item];
        prop_assert_eq!(tx.txid(), txid_before);
    }
}
