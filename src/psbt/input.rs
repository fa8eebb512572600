//! PSBT per-input map (BIP-174 §"Input Types").

use crate::curve::secp256k1;
use crate::der::decode_with_sighash;
use crate::encode::{Reader, write_varint, write_witness};
use crate::error::Error;
use crate::keys::decode_point;
use crate::psbt::map::{raw_key, read_map, write_pair, write_terminator, write_unknowns, UnknownMap};
use crate::script::is_valid_sighash;
use crate::transaction::{Transaction, TxOut};

fn assert_valid_pubkey_key_length(len: usize) -> Result<(), Error> {
    if len == 33 || len == 65 {
        Ok(())
    } else {
        Err(Error::value("PSBT pubkey key must be 33 or 65 bytes"))
    }
}

const PSBT_IN_NON_WITNESS_UTXO: u8 = 0x00;
const PSBT_IN_WITNESS_UTXO: u8 = 0x01;
const PSBT_IN_PARTIAL_SIG: u8 = 0x02;
const PSBT_IN_SIGHASH_TYPE: u8 = 0x03;
const PSBT_IN_REDEEM_SCRIPT: u8 = 0x04;
const PSBT_IN_WITNESS_SCRIPT: u8 = 0x05;
const PSBT_IN_BIP32_DERIVATION: u8 = 0x06;
const PSBT_IN_FINAL_SCRIPTSIG: u8 = 0x07;
const PSBT_IN_FINAL_SCRIPTWITNESS: u8 = 0x08;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub non_witness_utxo: Option<Transaction>,
    pub witness_utxo: Option<TxOut>,
    /// `(pubkey, DER signature + sighash byte)`, ordered by insertion.
    pub partial_sigs: Vec<(Vec<u8>, Vec<u8>)>,
    pub sighash_type: Option<u32>,
    pub redeem_script: Option<Vec<u8>>,
    pub witness_script: Option<Vec<u8>>,
    /// `(pubkey, master fingerprint + derivation path)`.
    pub bip32_derivations: Vec<(Vec<u8>, Vec<u8>)>,
    pub final_script_sig: Option<Vec<u8>>,
    pub final_script_witness: Option<Vec<Vec<u8>>>,
    pub unknowns: UnknownMap,
}

impl Input {
    pub fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        let pairs = read_map(reader)?;
        let mut input = Input::default();

        for pair in pairs {
            match (pair.key_type, pair.key_data.is_empty()) {
                (PSBT_IN_NON_WITNESS_UTXO, true) => {
                    input.non_witness_utxo = Some(Transaction::deserialize(&pair.value)?);
                }
                (PSBT_IN_WITNESS_UTXO, true) => {
                    let mut r = Reader::new(&pair.value);
                    let value = r.read_u64_le()?;
                    let script_pubkey = r.read_var_bytes()?.to_vec();
                    input.witness_utxo = Some(TxOut { value, script_pubkey });
                }
                (PSBT_IN_PARTIAL_SIG, false) => {
                    assert_valid_pubkey_key_length(pair.key_data.len())?;
                    let curve = secp256k1();
                    decode_point(&pair.key_data, &curve)?;
                    decode_with_sighash(&pair.value)?;
                    input.partial_sigs.push((pair.key_data, pair.value));
                }
                (PSBT_IN_SIGHASH_TYPE, true) => {
                    if pair.value.len() != 4 {
                        return Err(Error::value("PSBT sighash type must be 4 bytes"));
                    }
                    let mut buf = [0u8; 4];
                    buf.copy_from_slice(&pair.value);
                    let sighash = u32::from_le_bytes(buf);
                    if !is_valid_sighash(sighash) {
                        return Err(Error::value("PSBT sighash type is not a standard sighash"));
                    }
                    input.sighash_type = Some(sighash);
                }
                (PSBT_IN_REDEEM_SCRIPT, true) => input.redeem_script = Some(pair.value),
                (PSBT_IN_WITNESS_SCRIPT, true) => input.witness_script = Some(pair.value),
                (PSBT_IN_BIP32_DERIVATION, false) => {
                    assert_valid_pubkey_key_length(pair.key_data.len())?;
                    input.bip32_derivations.push((pair.key_data, pair.value));
                }
                (PSBT_IN_FINAL_SCRIPTSIG, true) => input.final_script_sig = Some(pair.value),
                (PSBT_IN_FINAL_SCRIPTWITNESS, true) => {
                    let mut r = Reader::new(&pair.value);
                    input.final_script_witness = Some(r.read_witness()?);
                }
                _ => {
                    input.unknowns.insert(raw_key(&pair), pair.value);
                }
            }
        }

        if input.non_witness_utxo.is_some() && input.witness_utxo.is_some() {
            return Err(Error::value("PSBT input has both non_witness_utxo and witness_utxo"));
        }

        Ok(input)
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        if let Some(tx) = &self.non_witness_utxo {
            write_pair(out, PSBT_IN_NON_WITNESS_UTXO, &[], &tx.serialize(true));
        }
        if let Some(utxo) = &self.witness_utxo {
            let mut value = Vec::new();
            value.extend_from_slice(&utxo.value.to_le_bytes());
            write_varint(&mut value, utxo.script_pubkey.len() as u64);
            value.extend_from_slice(&utxo.script_pubkey);
            write_pair(out, PSBT_IN_WITNESS_UTXO, &[], &value);
        }
        for (pubkey, sig) in &self.partial_sigs {
            write_pair(out, PSBT_IN_PARTIAL_SIG, pubkey, sig);
        }
        if let Some(sighash) = self.sighash_type {
            write_pair(out, PSBT_IN_SIGHASH_TYPE, &[], &sighash.to_le_bytes());
        }
        if let Some(script) = &self.redeem_script {
            write_pair(out, PSBT_IN_REDEEM_SCRIPT, &[], script);
        }
        if let Some(script) = &self.witness_script {
            write_pair(out, PSBT_IN_WITNESS_SCRIPT, &[], script);
        }
        for (pubkey, path) in &self.bip32_derivations {
            write_pair(out, PSBT_IN_BIP32_DERIVATION, pubkey, path);
        }
        if let Some(script) = &self.final_script_sig {
            write_pair(out, PSBT_IN_FINAL_SCRIPTSIG, &[], script);
        }
        if let Some(witness) = &self.final_script_witness {
            let mut value = Vec::new();
            write_witness(&mut value, witness);
            write_pair(out, PSBT_IN_FINAL_SCRIPTWITNESS, &[], &value);
        }
        write_unknowns(out, &self.unknowns);
        write_terminator(out);
    }
}
