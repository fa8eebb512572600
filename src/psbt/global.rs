//! PSBT global map (BIP-174 §"Global Types").

use crate::encode::Reader;
use crate::error::Error;
use crate::psbt::map::{raw_key, read_map, write_pair, write_terminator, write_unknowns, UnknownMap};
use crate::transaction::Transaction;

const PSBT_GLOBAL_UNSIGNED_TX: u8 = 0x00;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub unsigned_tx: Transaction,
    /// Anything besides `PSBT_GLOBAL_UNSIGNED_TX`: xpubs, proprietary keys,
    /// and any key type this codec doesn't give special treatment to.
    pub unknowns: UnknownMap,
}

impl Global {
    pub fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        let pairs = read_map(reader)?;
        let mut unsigned_tx = None;
        let mut unknowns = UnknownMap::new();

        for pair in pairs {
            if pair.key_type == PSBT_GLOBAL_UNSIGNED_TX && pair.key_data.is_empty() {
                let tx = Transaction::deserialize(&pair.value)?;
                if tx.inputs.iter().any(|i| !i.script_sig.is_empty() || !i.witness.is_empty()) {
                    return Err(Error::value("PSBT unsigned tx must have empty scriptSigs and no witness"));
                }
                unsigned_tx = Some(tx);
            } else {
                unknowns.insert(raw_key(&pair), pair.value);
            }
        }

        Ok(Global {
            unsigned_tx: unsigned_tx.ok_or_else(|| Error::value("PSBT global map is missing the unsigned transaction"))?,
            unknowns,
        })
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        write_pair(out, PSBT_GLOBAL_UNSIGNED_TX, &[], &self.unsigned_tx.serialize(false));
        write_unknowns(out, &self.unknowns);
        write_terminator(out);
    }
}
