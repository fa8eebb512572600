//! Raw key-value map primitives shared by the PSBT global/input/output maps.
//!
//! A PSBT map is a sequence of `(compact-size key, compact-size value)`
//! pairs terminated by a zero-length key. The key's first byte is itself a
//! "key type"; everything after it is type-specific key data (e.g. a pubkey
//! for `PARTIAL_SIG`).

use std::collections::{BTreeMap, BTreeSet};

use crate::encode::{write_var_bytes, Reader};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub key_type: u8,
    pub key_data: Vec<u8>,
    pub value: Vec<u8>,
}

/// Read key-value pairs until the zero-length-key separator. BIP-174
/// requires every key within a map to be unique.
pub fn read_map(reader: &mut Reader) -> Result<Vec<RawPair>, Error> {
    let mut pairs = Vec::new();
    let mut seen = BTreeSet::new();
    loop {
        let key = reader.read_var_bytes()?;
        if key.is_empty() {
            return Ok(pairs);
        }
        if !seen.insert(key.to_vec()) {
            return Err(Error::value("duplicate key in PSBT map"));
        }
        let key_type = key[0];
        let key_data = key[1..].to_vec();
        let value = reader.read_var_bytes()?.to_vec();
        pairs.push(RawPair { key_type, key_data, value });
    }
}

pub fn write_pair(out: &mut Vec<u8>, key_type: u8, key_data: &[u8], value: &[u8]) {
    let mut key = Vec::with_capacity(1 + key_data.len());
    key.push(key_type);
    key.extend_from_slice(key_data);
    write_var_bytes(out, &key);
    write_var_bytes(out, value);
}

pub fn write_terminator(out: &mut Vec<u8>) {
    out.push(0x00);
}

/// Keys this codec doesn't interpret, preserved verbatim so a round trip
/// never drops data a more capable signer might have attached. Keyed by the
/// full raw key bytes (type byte + key data) to keep duplicates apart.
pub type UnknownMap = BTreeMap<Vec<u8>, Vec<u8>>;

pub fn raw_key(pair: &RawPair) -> Vec<u8> {
    let mut k = Vec::with_capacity(1 + pair.key_data.len());
    k.push(pair.key_type);
    k.extend_from_slice(&pair.key_data);
    k
}

pub fn write_unknowns(out: &mut Vec<u8>, unknowns: &UnknownMap) {
    for (key, value) in unknowns {
        write_var_bytes(out, key);
        write_var_bytes(out, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_map() {
        let mut buf = Vec::new();
        write_pair(&mut buf, 0x01, &[0xaa], &[0xbb, 0xcc]);
        write_terminator(&mut buf);
        let mut reader = Reader::new(&buf);
        let pairs = read_map(&mut reader).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].key_type, 0x01);
        assert_eq!(pairs[0].key_data, vec![0xaa]);
        assert_eq!(pairs[0].value, vec![0xbb, 0xcc]);
    }

    #[test]
    fn empty_map_is_just_the_terminator() {
        let mut buf = Vec::new();
        write_terminator(&mut buf);
        let mut reader = Reader::new(&buf);
        assert!(read_map(&mut reader).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut buf = Vec::new();
        write_pair(&mut buf, 0x01, &[0xaa], &[0xbb]);
        write_pair(&mut buf, 0x01, &[0xaa], &[0xcc]);
        write_terminator(&mut buf);
        let mut reader = Reader::new(&buf);
        assert!(read_map(&mut reader).is_err());
    }
}
