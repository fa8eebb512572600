//! Bitcoin transaction codec: legacy and BIP-141 segwit serialization.

use crate::encode::{write_var_bytes, write_varint, write_witness, Reader};
use crate::error::Error;
use crate::hash::hash256;

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutPoint {
    pub txid: [u8; 32],
    pub vout: u32,
}

impl OutPoint {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.txid);
        out.extend_from_slice(&self.vout.to_le_bytes());
    }

    fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(OutPoint {
            txid: reader.read_array()?,
            vout: reader.read_u32_le()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "use-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// Empty for a non-segwit input; the segwit marker/flag is only
    /// serialized once, at the transaction level, if any input has a
    /// non-empty witness.
    pub witness: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "use-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxOut {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "use-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    fn has_witness(&self) -> bool {
        self.inputs.iter().any(|i| !i.witness.is_empty())
    }

    /// Serialize per BIP-144: emits the segwit marker/flag and witness
    /// stacks only if `include_witness` is set and at least one input
    /// carries a witness.
    #[must_use]
    pub fn serialize(&self, include_witness: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let use_segwit = include_witness && self.has_witness();

        out.extend_from_slice(&self.version.to_le_bytes());
        if use_segwit {
            out.push(SEGWIT_MARKER);
            out.push(SEGWIT_FLAG);
        }

        write_varint(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            input.previous_output.write(&mut out);
            write_var_bytes(&mut out, &input.script_sig);
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_varint(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.value.to_le_bytes());
            write_var_bytes(&mut out, &output.script_pubkey);
        }

        if use_segwit {
            for input in &self.inputs {
                write_witness(&mut out, &input.witness);
            }
        }

        out.extend_from_slice(&self.lock_time.to_le_bytes());
        out
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);
        let version = reader.read_u32_le()? as i32;

        let mut marker_byte = None;
        let mut segwit = false;
        let input_count_or_marker = reader.read_u8()?;
        if input_count_or_marker == SEGWIT_MARKER {
            let flag = reader.read_u8()?;
            if flag != SEGWIT_FLAG {
                return Err(Error::value("unsupported segwit flag"));
            }
            segwit = true;
        } else {
            marker_byte = Some(input_count_or_marker);
        }

        let input_count = if let Some(first) = marker_byte {
            read_varint_with_first_byte(&mut reader, first)?
        } else {
            reader.read_varint()?
        };

        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            let previous_output = OutPoint::read(&mut reader)?;
            let script_sig = reader.read_var_bytes()?.to_vec();
            let sequence = reader.read_u32_le()?;
            inputs.push(TxIn {
                previous_output,
                script_sig,
                sequence,
                witness: Vec::new(),
            });
        }

        let output_count = reader.read_varint()?;
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            let value = reader.read_u64_le()?;
            let script_pubkey = reader.read_var_bytes()?.to_vec();
            outputs.push(TxOut { value, script_pubkey });
        }

        if segwit {
            for input in &mut inputs {
                input.witness = reader.read_witness()?;
            }
        }

        let lock_time = reader.read_u32_le()?;
        if !reader.is_empty() {
            return Err(Error::value("trailing bytes after transaction"));
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// The legacy transaction hash (double-SHA256 of the non-witness
    /// serialization), in natural (internal) byte order.
    #[must_use]
    pub fn txid(&self) -> [u8; 32] {
        hash256(&self.serialize(false))
    }

    /// The witness transaction hash (double-SHA256 of the full segwit
    /// serialization). Equal to `txid()` for transactions with no witness
    /// data.
    #[must_use]
    pub fn wtxid(&self) -> [u8; 32] {
        hash256(&self.serialize(true))
    }
}

/// A varint's first byte was already consumed while probing for the segwit
/// marker; finish decoding it here rather than re-reading from the buffer.
fn read_varint_with_first_byte(reader: &mut Reader, first: u8) -> Result<u64, Error> {
    match first {
        0xfd => {
            let v = reader.read_u16_le()? as u64;
            if v < 0xfd {
                return Err(Error::value("non-canonical varint encoding"));
            }
            Ok(v)
        }
        0xfe => {
            let v = reader.read_u32_le()? as u64;
            if v <= u64::from(u16::MAX) {
                return Err(Error::value("non-canonical varint encoding"));
            }
            Ok(v)
        }
        0xff => {
            let v = reader.read_u64_le()?;
            if v <= u64::from(u32::MAX) {
                return Err(Error::value("non-canonical varint encoding"));
            }
            Ok(v)
        }
        n => Ok(u64::from(n)),
    }
}
