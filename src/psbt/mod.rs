//! Partially Signed Bitcoin Transactions (BIP-174).

pub mod global;
pub mod input;
pub mod map;
pub mod output;

pub use global::Global;
pub use input::Input;
pub use output::Output;

use crate::encode::Reader;
use crate::error::Error;

const MAGIC: [u8; 5] = [0x70, 0x73, 0x62, 0x74, 0xff];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Psbt {
    pub global: Global,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Psbt {
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        self.global.serialize(&mut out);
        for input in &self.inputs {
            input.serialize(&mut out);
        }
        for output in &self.outputs {
            output.serialize(&mut out);
        }
        out
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);
        let magic: [u8; 5] = reader.read_array()?;
        if magic != MAGIC {
            return Err(Error::value("missing PSBT magic bytes"));
        }

        let global = Global::deserialize(&mut reader)?;
        let input_count = global.unsigned_tx.inputs.len();
        let output_count = global.unsigned_tx.outputs.len();

        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(Input::deserialize(&mut reader)?);
        }
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(Output::deserialize(&mut reader)?);
        }

        if !reader.is_empty() {
            return Err(Error::value("trailing bytes after PSBT"));
        }

        tracing::trace!(input_count, output_count, "parsed PSBT");
        Ok(Psbt { global, inputs, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecdsa::sign;
    use crate::hash::sha256;
    use crate::keys::{Network, PrivateKey};
    use crate::num::U256;
    use crate::psbt::map::UnknownMap;
    use crate::transaction::{OutPoint, Transaction, TxIn, TxOut};

    fn partial_sig_fixture() -> (Vec<u8>, Vec<u8>) {
        let key = PrivateKey::from_scalar(&U256::from_u64(13_579), true, Network::Mainnet).unwrap();
        let hash = sha256(b"preserves_partial_signatures_and_witness_utxo");
        let sig = sign(&key, &hash).unwrap();
        let mut der = sig.to_der();
        der.push(0x01);
        (key.public_key().to_sec1(), der)
    }

    fn sample_unsigned_tx() -> Transaction {
        Transaction {
            version: 2,
            inputs: vec![TxIn {
                previous_output: OutPoint { txid: [0x01; 32], vout: 0 },
                script_sig: Vec::new(),
                sequence: 0xffff_ffff,
                witness: Vec::new(),
            }],
            outputs: vec![TxOut {
                value: 10_000,
                script_pubkey: vec![0x76, 0xa9],
            }],
            lock_time: 0,
        }
    }

    #[test]
    fn round_trips_a_minimal_psbt() {
        let psbt = Psbt {
            global: Global {
                unsigned_tx: sample_unsigned_tx(),
                unknowns: UnknownMap::new(),
            },
            inputs: vec![Input::default()],
            outputs: vec![Output::default()],
        };
        let bytes = psbt.serialize();
        assert_eq!(&bytes[..5], &MAGIC);
        let parsed = Psbt::deserialize(&bytes).unwrap();
        assert_eq!(parsed, psbt);
    }

    #[test]
    fn preserves_unknown_global_keys() {
        let mut global = Global {
            unsigned_tx: sample_unsigned_tx(),
            unknowns: UnknownMap::new(),
        };
        global.unknowns.insert(vec![0xfc, 0x01, 0x02], vec![0xde, 0xad, 0xbe, 0xef]);
        let psbt = Psbt {
            global,
            inputs: vec![Input::default()],
            outputs: vec![Output::default()],
        };
        let bytes = psbt.serialize();
        let parsed = Psbt::deserialize(&bytes).unwrap();
        assert_eq!(parsed.global.unknowns, psbt.global.unknowns);
    }

    #[test]
    fn preserves_partial_signatures_and_witness_utxo() {
        let mut input = Input::default();
        input.witness_utxo = Some(TxOut {
            value: 10_000,
            script_pubkey: vec![0x00, 0x14],
        });
        let (pubkey, sig) = partial_sig_fixture();
        input.partial_sigs.push((pubkey, sig));

        let psbt = Psbt {
            global: Global {
                unsigned_tx: sample_unsigned_tx(),
                unknowns: UnknownMap::new(),
            },
            inputs: vec![input],
            outputs: vec![Output::default()],
        };
        let bytes = psbt.serialize();
        let parsed = Psbt::deserialize(&bytes).unwrap();
        assert_eq!(parsed, psbt);
    }

    #[test]
    fn rejects_missing_magic() {
        assert!(Psbt::deserialize(b"not a psbt at all here").is_err());
    }

    #[test]
    fn rejects_unsigned_tx_with_populated_script_sig() {
        let mut tx = sample_unsigned_tx();
        tx.inputs[0].script_sig = vec![0x01];
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        crate::psbt::map::write_pair(&mut out, 0x00, &[], &tx.serialize(false));
        crate::psbt::map::write_terminator(&mut out);
        assert!(Psbt::deserialize(&out).is_err());
    }
}
