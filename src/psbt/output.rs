//! PSBT per-output map (BIP-174 §"Output Types").

use crate::encode::Reader;
use crate::error::Error;
use crate::psbt::map::{raw_key, read_map, write_pair, write_terminator, write_unknowns, UnknownMap};

const PSBT_OUT_REDEEM_SCRIPT: u8 = 0x00;
const PSBT_OUT_WITNESS_SCRIPT: u8 = 0x01;
const PSBT_OUT_BIP32_DERIVATION: u8 = 0x02;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub redeem_script: Option<Vec<u8>>,
    pub witness_script: Option<Vec<u8>>,
    pub bip32_derivations: Vec<(Vec<u8>, Vec<u8>)>,
    pub unknowns: UnknownMap,
}

impl Output {
    pub fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        let pairs = read_map(reader)?;
        let mut output = Output::default();

        for pair in pairs {
            match (pair.key_type, pair.key_data.is_empty()) {
                (PSBT_OUT_REDEEM_SCRIPT, true) => output.redeem_script = Some(pair.value),
                (PSBT_OUT_WITNESS_SCRIPT, true) => output.witness_script = Some(pair.value),
                (PSBT_OUT_BIP32_DERIVATION, false) => {
                    output.bip32_derivations.push((pair.key_data, pair.value));
                }
                _ => {
                    output.unknowns.insert(raw_key(&pair), pair.value);
                }
            }
        }

        Ok(output)
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        if let Some(script) = &self.redeem_script {
            write_pair(out, PSBT_OUT_REDEEM_SCRIPT, &[], script);
        }
        if let Some(script) = &self.witness_script {
            write_pair(out, PSBT_OUT_WITNESS_SCRIPT, &[], script);
        }
        for (pubkey, path) in &self.bip32_derivations {
            write_pair(out, PSBT_OUT_BIP32_DERIVATION, pubkey, path);
        }
        write_unknowns(out, &self.unknowns);
        write_terminator(out);
    }
}
